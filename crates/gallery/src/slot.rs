use serde::Serialize;

/// Text shown in a slot whose image failed to load.
pub const FAILED_TO_LOAD: &str = "Failed to load";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotId {
    Primary,
    Secondary,
}

impl SlotId {
    pub fn other(self) -> SlotId {
        match self {
            SlotId::Primary => SlotId::Secondary,
            SlotId::Secondary => SlotId::Primary,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadState {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSlot {
    pub src: Option<String>,
    pub load_state: Option<LoadState>,
    pub is_active: bool,
}

impl ImageSlot {
    pub fn begin_load(&mut self, src: String) {
        self.src = Some(src);
        self.load_state = Some(LoadState::Loading);
    }

    /// Placeholder text to render instead of the image.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self.load_state {
            Some(LoadState::Error) => Some(FAILED_TO_LOAD),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.src = None;
        self.load_state = None;
    }
}

/// The two stacked slots of one image position. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPair {
    pub primary: ImageSlot,
    pub secondary: ImageSlot,
    active: SlotId,
}

impl Default for SlotPair {
    fn default() -> Self {
        Self {
            primary: ImageSlot {
                is_active: true,
                ..ImageSlot::default()
            },
            secondary: ImageSlot::default(),
            active: SlotId::Primary,
        }
    }
}

impl SlotPair {
    pub fn active_id(&self) -> SlotId {
        self.active
    }

    pub fn inactive_id(&self) -> SlotId {
        self.active.other()
    }

    pub fn get(&self, id: SlotId) -> &ImageSlot {
        match id {
            SlotId::Primary => &self.primary,
            SlotId::Secondary => &self.secondary,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> &mut ImageSlot {
        match id {
            SlotId::Primary => &mut self.primary,
            SlotId::Secondary => &mut self.secondary,
        }
    }

    pub fn active(&self) -> &ImageSlot {
        self.get(self.active)
    }

    pub fn inactive_mut(&mut self) -> &mut ImageSlot {
        self.get_mut(self.active.other())
    }

    /// Makes `id` the visible slot.
    pub fn activate(&mut self, id: SlotId) {
        self.active = id;
        self.get_mut(id).is_active = true;
        self.get_mut(id.other()).is_active = false;
    }
}
