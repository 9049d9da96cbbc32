//! Per-position crossfade between two stacked image slots.

use foundation::ids::WaypointId;
use foundation::time::Time;
use runtime::timer::Debounce;
use serde::{Deserialize, Serialize};

use crate::command::GalleryCommand;
use crate::layout::{LayoutProbe, LayoutTarget};
use crate::request::{LoadOutcome, LoadTicket, TicketIssuer};
use crate::slot::{LoadState, SlotPair};
use crate::sources::ImageSources;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossfadeTiming {
    pub debounce_ms: f64,
    pub crossfade_ms: f64,
}

impl CrossfadeTiming {
    pub const NORMAL: Self = Self {
        debounce_ms: 50.0,
        crossfade_ms: 200.0,
    };
    /// Used while the route indicator is moving.
    pub const FAST: Self = Self {
        debounce_ms: 10.0,
        crossfade_ms: 100.0,
    };
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CrossfadePhase {
    Idle,
    Debouncing { target: WaypointId },
    Loading { target: WaypointId, ticket: LoadTicket },
    AwaitingLayout { target: WaypointId },
    Transitioning { target: WaypointId, until: Time },
}

/// How a position came to rest after a transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Settled {
    Shown(WaypointId),
    Failed(WaypointId),
}

/// Shared state a position needs while advancing.
pub struct Context<'a> {
    pub sources: &'a ImageSources,
    pub issuer: &'a mut TicketIssuer,
    pub commands: &'a mut Vec<GalleryCommand>,
    pub timing: CrossfadeTiming,
}

#[derive(Debug, Clone)]
pub struct ImagePosition {
    index: usize,
    slots: SlotPair,
    phase: CrossfadePhase,
    debounce: Debounce,
    deferred: Option<WaypointId>,
    shown: Option<WaypointId>,
}

impl ImagePosition {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            slots: SlotPair::default(),
            phase: CrossfadePhase::Idle,
            debounce: Debounce::new(CrossfadeTiming::NORMAL.debounce_ms),
            deferred: None,
            shown: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based image number used in filenames.
    pub fn image_number(&self) -> usize {
        self.index + 1
    }

    pub fn slots(&self) -> &SlotPair {
        &self.slots
    }

    pub fn phase(&self) -> CrossfadePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == CrossfadePhase::Idle && self.deferred.is_none()
    }

    /// Waypoint whose image is currently visible.
    pub fn shown(&self) -> Option<WaypointId> {
        self.shown
    }

    pub fn deferred(&self) -> Option<WaypointId> {
        self.deferred
    }

    /// Requests `id`'s image. Returns `false` when nothing changes.
    pub fn set_waypoint(&mut self, id: WaypointId, now: Time, timing: CrossfadeTiming) -> bool {
        match self.phase {
            CrossfadePhase::Idle if self.shown == Some(id) => false,
            CrossfadePhase::Transitioning { target, .. } => {
                let next = (target != id).then_some(id);
                let changed = next != self.deferred;
                self.deferred = next;
                changed
            }
            CrossfadePhase::Loading { target, .. } | CrossfadePhase::AwaitingLayout { target }
                if target == id =>
            {
                false
            }
            CrossfadePhase::Debouncing { .. }
            | CrossfadePhase::Loading { .. }
            | CrossfadePhase::AwaitingLayout { .. }
                if self.shown == Some(id) =>
            {
                tracing::trace!(position = self.index, waypoint = %id, "crossfade: back to shown image");
                self.debounce.cancel();
                self.slots.inactive_mut().clear();
                self.phase = CrossfadePhase::Idle;
                true
            }
            _ => {
                if self.phase != CrossfadePhase::Idle {
                    tracing::trace!(position = self.index, waypoint = %id, "crossfade: target superseded");
                }
                self.debounce.set_quiet_ms(timing.debounce_ms);
                self.debounce.poke(now);
                self.phase = CrossfadePhase::Debouncing { target: id };
                true
            }
        }
    }

    pub fn tick(&mut self, now: Time, probe: &dyn LayoutProbe, cx: &mut Context<'_>) -> Option<Settled> {
        match self.phase {
            CrossfadePhase::Idle => None,
            CrossfadePhase::Debouncing { target } => {
                if self.debounce.fire_if_due(now) {
                    self.start_load(target, cx);
                }
                None
            }
            CrossfadePhase::Loading { .. } => None,
            CrossfadePhase::AwaitingLayout { target } => {
                let slot = self.slots.inactive_id();
                let height = probe.rendered_height(LayoutTarget::Slot {
                    position: self.index,
                    slot,
                });
                if height > 0.0 {
                    let duration_ms = cx.timing.crossfade_ms;
                    self.phase = CrossfadePhase::Transitioning {
                        target,
                        until: now.plus_ms(duration_ms),
                    };
                    cx.commands.push(GalleryCommand::StartCrossfade {
                        position: self.index,
                        to: slot,
                        duration_ms,
                    });
                }
                None
            }
            CrossfadePhase::Transitioning { target, until } => {
                if now.ms() < until.ms() {
                    return None;
                }
                let incoming = self.slots.inactive_id();
                self.slots.activate(incoming);
                self.slots.inactive_mut().clear();
                self.shown = Some(target);
                self.phase = CrossfadePhase::Idle;
                tracing::debug!(position = self.index, waypoint = %target, "crossfade: settled");

                if let Some(next) = self.deferred.take() {
                    self.set_waypoint(next, now, cx.timing);
                }
                Some(Settled::Shown(target))
            }
        }
    }

    /// Applies a load completion. `None` when `ticket` is not the one this
    /// position is waiting for.
    pub fn on_load(
        &mut self,
        ticket: LoadTicket,
        outcome: &LoadOutcome,
        commands: &mut Vec<GalleryCommand>,
    ) -> Option<Option<Settled>> {
        let CrossfadePhase::Loading {
            target,
            ticket: expected,
        } = self.phase
        else {
            return None;
        };
        if ticket != expected {
            return None;
        }

        match outcome {
            LoadOutcome::Loaded => {
                self.slots.inactive_mut().load_state = Some(LoadState::Ready);
                self.phase = CrossfadePhase::AwaitingLayout { target };
                Some(None)
            }
            LoadOutcome::Failed { reason } => {
                tracing::warn!(position = self.index, waypoint = %target, %reason, "crossfade: image failed to load");
                let failed = self.slots.inactive_id();
                self.slots.inactive_mut().load_state = Some(LoadState::Error);
                self.slots.activate(failed);
                self.slots.inactive_mut().clear();
                self.shown = Some(target);
                self.phase = CrossfadePhase::Idle;
                commands.push(GalleryCommand::ActivateSlot {
                    position: self.index,
                    slot: failed,
                });
                Some(Some(Settled::Failed(target)))
            }
        }
    }

    fn start_load(&mut self, target: WaypointId, cx: &mut Context<'_>) {
        let ticket = cx.issuer.issue();
        let url = cx.sources.thumbnail(target, self.image_number());
        let slot = self.slots.inactive_id();
        self.slots.inactive_mut().begin_load(url.clone());
        self.phase = CrossfadePhase::Loading { target, ticket };
        tracing::debug!(position = self.index, waypoint = %target, ticket = ticket.0, "crossfade: loading thumbnail");
        cx.commands.push(GalleryCommand::LoadImage {
            ticket,
            position: self.index,
            slot,
            url,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, CrossfadePhase, CrossfadeTiming, ImagePosition, Settled};
    use crate::command::GalleryCommand;
    use crate::layout::LayoutTarget;
    use crate::request::{LoadOutcome, LoadTicket, TicketIssuer};
    use crate::slot::{LoadState, SlotId};
    use crate::sources::ImageSources;
    use foundation::ids::WaypointId;
    use foundation::time::Time;

    struct Harness {
        sources: ImageSources,
        issuer: TicketIssuer,
        commands: Vec<GalleryCommand>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                sources: ImageSources::default(),
                issuer: TicketIssuer::new(),
                commands: Vec::new(),
            }
        }

        fn tick(&mut self, position: &mut ImagePosition, now: f64, laid_out: bool) -> Option<Settled> {
            let probe = move |_: LayoutTarget| if laid_out { 120.0 } else { 0.0 };
            let mut cx = Context {
                sources: &self.sources,
                issuer: &mut self.issuer,
                commands: &mut self.commands,
                timing: CrossfadeTiming::NORMAL,
            };
            position.tick(Time(now), &probe, &mut cx)
        }

        fn last_ticket(&self) -> LoadTicket {
            self.issuer.latest().unwrap()
        }
    }

    #[test]
    fn full_cycle_flips_active_slot() {
        let mut h = Harness::new();
        let mut p = ImagePosition::new(0);
        assert!(p.set_waypoint(WaypointId(2), Time(0.0), CrossfadeTiming::NORMAL));
        assert_eq!(h.tick(&mut p, 49.0, true), None);
        assert!(h.commands.is_empty());
        h.tick(&mut p, 50.0, true);
        assert_eq!(
            h.commands,
            vec![GalleryCommand::LoadImage {
                ticket: LoadTicket(1),
                position: 0,
                slot: SlotId::Secondary,
                url: "/thumbnails/location-2-image-1.jpg".to_string(),
            }]
        );

        assert_eq!(p.on_load(LoadTicket(1), &LoadOutcome::Loaded, &mut h.commands), Some(None));
        // Not laid out yet: keep waiting.
        h.tick(&mut p, 60.0, false);
        assert_eq!(p.phase(), CrossfadePhase::AwaitingLayout { target: WaypointId(2) });
        h.tick(&mut p, 70.0, true);
        assert!(matches!(p.phase(), CrossfadePhase::Transitioning { .. }));
        assert_eq!(h.tick(&mut p, 269.0, true), None);
        assert_eq!(h.tick(&mut p, 270.0, true), Some(Settled::Shown(WaypointId(2))));
        assert_eq!(p.slots().active_id(), SlotId::Secondary);
        assert_eq!(p.shown(), Some(WaypointId(2)));
        assert!(p.is_idle());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut h = Harness::new();
        let mut p = ImagePosition::new(1);
        p.set_waypoint(WaypointId(2), Time(0.0), CrossfadeTiming::NORMAL);
        h.tick(&mut p, 50.0, true);
        let first = h.last_ticket();

        p.set_waypoint(WaypointId(3), Time(60.0), CrossfadeTiming::NORMAL);
        h.tick(&mut p, 110.0, true);
        let second = h.last_ticket();
        assert!(second > first);

        assert_eq!(p.on_load(first, &LoadOutcome::Loaded, &mut h.commands), None);
        assert!(matches!(p.phase(), CrossfadePhase::Loading { .. }));
        assert_eq!(p.on_load(second, &LoadOutcome::Loaded, &mut h.commands), Some(None));
    }

    #[test]
    fn failure_is_shown_in_place() {
        let mut h = Harness::new();
        let mut p = ImagePosition::new(2);
        p.set_waypoint(WaypointId(5), Time(0.0), CrossfadeTiming::NORMAL);
        h.tick(&mut p, 50.0, true);
        let outcome = LoadOutcome::failed("404 Not Found");
        assert_eq!(
            p.on_load(h.last_ticket(), &outcome, &mut h.commands),
            Some(Some(Settled::Failed(WaypointId(5))))
        );
        let active = p.slots().active();
        assert_eq!(active.load_state, Some(LoadState::Error));
        assert_eq!(active.placeholder(), Some("Failed to load"));
        assert!(p.is_idle());
        // No retry happens on later frames.
        let issued = h.last_ticket();
        h.tick(&mut p, 500.0, true);
        assert_eq!(h.last_ticket(), issued);
    }

    #[test]
    fn change_during_transition_runs_afterwards() {
        let mut h = Harness::new();
        let mut p = ImagePosition::new(0);
        p.set_waypoint(WaypointId(2), Time(0.0), CrossfadeTiming::NORMAL);
        h.tick(&mut p, 50.0, true);
        p.on_load(h.last_ticket(), &LoadOutcome::Loaded, &mut h.commands);
        h.tick(&mut p, 60.0, true);

        assert!(p.set_waypoint(WaypointId(3), Time(100.0), CrossfadeTiming::NORMAL));
        assert!(p.set_waypoint(WaypointId(4), Time(110.0), CrossfadeTiming::NORMAL));
        assert_eq!(p.deferred(), Some(WaypointId(4)));

        assert_eq!(h.tick(&mut p, 260.0, true), Some(Settled::Shown(WaypointId(2))));
        assert_eq!(p.phase(), CrossfadePhase::Debouncing { target: WaypointId(4) });
    }

    #[test]
    fn returning_to_shown_image_cancels() {
        let mut h = Harness::new();
        let mut p = ImagePosition::new(0);
        p.set_waypoint(WaypointId(1), Time(0.0), CrossfadeTiming::NORMAL);
        h.tick(&mut p, 50.0, true);
        p.on_load(h.last_ticket(), &LoadOutcome::Loaded, &mut h.commands);
        h.tick(&mut p, 60.0, true);
        h.tick(&mut p, 260.0, true);

        p.set_waypoint(WaypointId(2), Time(300.0), CrossfadeTiming::NORMAL);
        assert!(p.set_waypoint(WaypointId(1), Time(310.0), CrossfadeTiming::NORMAL));
        assert!(p.is_idle());
        assert!(!p.set_waypoint(WaypointId(1), Time(320.0), CrossfadeTiming::NORMAL));
    }
}
