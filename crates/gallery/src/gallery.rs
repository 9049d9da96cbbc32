use std::collections::{BTreeMap, BTreeSet};

use foundation::bounds::Rect;
use foundation::ids::WaypointId;
use foundation::time::Time;
use serde::{Deserialize, Serialize};

use crate::command::GalleryCommand;
use crate::crossfade::{Context, CrossfadeTiming, ImagePosition, Settled};
use crate::expansion::{Expansion, ExpansionSpeed, ExpansionTiming};
use crate::layout::LayoutProbe;
use crate::request::{LoadOutcome, LoadTicket, TicketIssuer};
use crate::slot::SlotPair;
use crate::sources::ImageSources;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryConfig {
    pub positions: usize,
    pub normal: CrossfadeTiming,
    pub fast: CrossfadeTiming,
    pub expansion: ExpansionTiming,
    pub preload_full_images: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            positions: 3,
            normal: CrossfadeTiming::NORMAL,
            fast: CrossfadeTiming::FAST,
            expansion: ExpansionTiming::default(),
            preload_full_images: true,
        }
    }
}

/// The image strip of the navigation card.
///
/// Owns every image position, the ticket counter shared by all loads, the set
/// of full-resolution URLs known to be cached, and the expansion overlay. The
/// host performs the drained [`GalleryCommand`]s and reports loads back through
/// [`Gallery::on_load`].
#[derive(Debug)]
pub struct Gallery {
    config: GalleryConfig,
    sources: ImageSources,
    positions: Vec<ImagePosition>,
    issuer: TicketIssuer,
    preloading: BTreeMap<LoadTicket, String>,
    preloaded: BTreeSet<String>,
    expansion: Expansion,
    expansion_full_url: Option<String>,
    deferred: Option<WaypointId>,
    fast: bool,
    commands: Vec<GalleryCommand>,
}

impl Gallery {
    pub fn new(config: GalleryConfig, sources: ImageSources) -> Self {
        let positions = (0..config.positions).map(ImagePosition::new).collect();
        Self {
            config,
            sources,
            positions,
            issuer: TicketIssuer::new(),
            preloading: BTreeMap::new(),
            preloaded: BTreeSet::new(),
            expansion: Expansion::default(),
            expansion_full_url: None,
            deferred: None,
            fast: false,
            commands: Vec::new(),
        }
    }

    pub fn sources(&self) -> &ImageSources {
        &self.sources
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn slots(&self, position: usize) -> Option<&SlotPair> {
        self.positions.get(position).map(|p| p.slots())
    }

    pub fn position(&self, position: usize) -> Option<&ImagePosition> {
        self.positions.get(position)
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    /// Shorter debounce and crossfade while the indicator is travelling.
    pub fn set_fast_mode(&mut self, fast: bool) {
        self.fast = fast;
    }

    pub fn is_idle(&self) -> bool {
        self.expansion.is_collapsed()
            && self.deferred.is_none()
            && self.positions.iter().all(|p| p.is_idle())
    }

    pub fn is_preloaded(&self, url: &str) -> bool {
        self.preloaded.contains(url)
    }

    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    fn timing(&self) -> CrossfadeTiming {
        if self.fast {
            self.config.fast
        } else {
            self.config.normal
        }
    }

    /// Switches every position to `id`'s images.
    ///
    /// While an image is expanded the change waits until it has collapsed.
    pub fn set_waypoint(&mut self, id: WaypointId, now: Time) {
        if !self.expansion.is_collapsed() {
            tracing::trace!(waypoint = %id, "gallery: waypoint change deferred until collapse");
            self.deferred = Some(id);
            return;
        }
        let timing = self.timing();
        for position in &mut self.positions {
            position.set_waypoint(id, now, timing);
        }
    }

    pub fn tick(&mut self, now: Time, probe: &dyn LayoutProbe) {
        let timing = self.timing();
        let mut settled = Vec::new();
        {
            let mut cx = Context {
                sources: &self.sources,
                issuer: &mut self.issuer,
                commands: &mut self.commands,
                timing,
            };
            for position in &mut self.positions {
                if let Some(Settled::Shown(id)) = position.tick(now, probe, &mut cx) {
                    settled.push((position.image_number(), id));
                }
            }
        }
        for (image, id) in settled {
            self.preload_full(id, image);
        }

        if self.expansion.tick(now, probe, &mut self.commands) {
            self.expansion_full_url = None;
        }
        if self.expansion.is_collapsed()
            && let Some(id) = self.deferred.take()
        {
            self.set_waypoint(id, now);
        }
    }

    /// Routes a load completion to whoever is waiting on `ticket`.
    ///
    /// Returns `false` for stale tickets, which are dropped.
    pub fn on_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        for position in &mut self.positions {
            if position.on_load(ticket, &outcome, &mut self.commands).is_some() {
                return true;
            }
        }

        if let Some(url) = self.preloading.remove(&ticket) {
            match outcome {
                LoadOutcome::Loaded => {
                    self.preloaded.insert(url);
                }
                LoadOutcome::Failed { reason } => {
                    tracing::warn!(%url, %reason, "gallery: full image preload failed");
                }
            }
            return true;
        }

        match self.expansion.on_load(ticket, &outcome, &mut self.commands) {
            Some(true) => {
                if let Some(url) = self.expansion_full_url.clone() {
                    self.preloaded.insert(url);
                }
                true
            }
            Some(false) => {
                self.expansion_full_url = None;
                true
            }
            None => {
                tracing::trace!(ticket = ticket.0, "gallery: stale load ignored");
                false
            }
        }
    }

    /// Grows `position` from its on-page `rect` to `viewport`.
    pub fn expand(
        &mut self,
        position: usize,
        rect: Rect,
        viewport: Rect,
        speed: ExpansionSpeed,
    ) -> bool {
        let Some(shown) = self.positions.get(position).and_then(|p| p.shown()) else {
            return false;
        };
        let image = position + 1;
        let url = self.sources.full(shown, image);
        let preloaded = self.preloaded.contains(&url);
        let duration_ms = self.config.expansion.duration_ms(speed);
        let started = self.expansion.begin(
            position,
            rect,
            viewport,
            duration_ms,
            url.clone(),
            preloaded,
            &mut self.issuer,
            &mut self.commands,
        );
        if started {
            self.expansion_full_url = Some(url);
        }
        started
    }

    pub fn collapse(&mut self, now: Time) {
        if self.expansion.collapse(now, &mut self.commands) {
            self.expansion_full_url = None;
            if let Some(id) = self.deferred.take() {
                self.set_waypoint(id, now);
            }
        }
    }

    pub fn overlay_rect(&self, now: Time) -> Option<Rect> {
        self.expansion.overlay_rect(now)
    }

    pub fn drain_commands(&mut self) -> Vec<GalleryCommand> {
        std::mem::take(&mut self.commands)
    }

    fn preload_full(&mut self, id: WaypointId, image: usize) {
        if !self.config.preload_full_images {
            return;
        }
        let url = self.sources.full(id, image);
        if self.preloaded.contains(&url) || self.preloading.values().any(|u| *u == url) {
            return;
        }
        let ticket = self.issuer.issue();
        self.preloading.insert(ticket, url.clone());
        self.commands.push(GalleryCommand::PreloadImage { ticket, url });
    }
}
