use crate::slot::SlotId;

/// Something in the gallery whose rendered size the host can measure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutTarget {
    Slot { position: usize, slot: SlotId },
    /// The full-resolution image beneath an expanding thumbnail.
    Full { position: usize },
}

/// Reads layout from the page. A height of zero means "not laid out yet".
pub trait LayoutProbe {
    fn rendered_height(&self, target: LayoutTarget) -> f64;
}

impl<F> LayoutProbe for F
where
    F: Fn(LayoutTarget) -> f64,
{
    fn rendered_height(&self, target: LayoutTarget) -> f64 {
        self(target)
    }
}
