//! Growing one image position into a full-viewport overlay and back.

use foundation::bounds::Rect;
use foundation::time::Time;
use serde::{Deserialize, Serialize};

use crate::command::GalleryCommand;
use crate::layout::{LayoutProbe, LayoutTarget};
use crate::request::{LoadOutcome, LoadTicket, TicketIssuer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpansionSpeed {
    Normal,
    Slow,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpansionTiming {
    pub expand_ms: f64,
    pub slow_expand_ms: f64,
}

impl Default for ExpansionTiming {
    fn default() -> Self {
        Self {
            expand_ms: 300.0,
            slow_expand_ms: 600.0,
        }
    }
}

impl ExpansionTiming {
    pub fn duration_ms(&self, speed: ExpansionSpeed) -> f64 {
        match speed {
            ExpansionSpeed::Normal => self.expand_ms,
            ExpansionSpeed::Slow => self.slow_expand_ms,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ExpansionPhase {
    Collapsed,
    LoadingFull {
        ticket: LoadTicket,
    },
    AwaitingFullLayout,
    Expanding {
        start: Time,
    },
    Expanded,
    Collapsing {
        start: Time,
        from: Rect,
    },
}

/// Geometry captured when an expansion begins.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Capture {
    position: usize,
    origin: Rect,
    viewport: Rect,
    duration_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Expansion {
    phase: ExpansionPhase,
    capture: Option<Capture>,
}

impl Default for Expansion {
    fn default() -> Self {
        Self {
            phase: ExpansionPhase::Collapsed,
            capture: None,
        }
    }
}

impl Expansion {
    pub fn phase(&self) -> ExpansionPhase {
        self.phase
    }

    pub fn is_collapsed(&self) -> bool {
        self.phase == ExpansionPhase::Collapsed
    }

    pub fn position(&self) -> Option<usize> {
        self.capture.map(|c| c.position)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        &mut self,
        position: usize,
        origin: Rect,
        viewport: Rect,
        duration_ms: f64,
        full_url: String,
        preloaded: bool,
        issuer: &mut TicketIssuer,
        commands: &mut Vec<GalleryCommand>,
    ) -> bool {
        if !self.is_collapsed() || origin.is_empty() {
            return false;
        }
        self.capture = Some(Capture {
            position,
            origin,
            viewport,
            duration_ms,
        });
        if preloaded {
            self.phase = ExpansionPhase::AwaitingFullLayout;
            commands.push(GalleryCommand::ShowFullImage {
                position,
                url: full_url,
            });
        } else {
            let ticket = issuer.issue();
            self.phase = ExpansionPhase::LoadingFull { ticket };
            commands.push(GalleryCommand::LoadFullImage {
                ticket,
                position,
                url: full_url,
            });
        }
        tracing::debug!(position, preloaded, "expansion: begin");
        true
    }

    /// `None` when the ticket is not the pending full-image load.
    pub fn on_load(
        &mut self,
        ticket: LoadTicket,
        outcome: &LoadOutcome,
        commands: &mut Vec<GalleryCommand>,
    ) -> Option<bool> {
        let ExpansionPhase::LoadingFull { ticket: expected } = self.phase else {
            return None;
        };
        if ticket != expected {
            return None;
        }
        let capture = self.capture?;
        match outcome {
            LoadOutcome::Loaded => {
                self.phase = ExpansionPhase::AwaitingFullLayout;
                Some(true)
            }
            LoadOutcome::Failed { reason } => {
                tracing::warn!(position = capture.position, %reason, "expansion: full image failed, staying collapsed");
                self.reset();
                commands.push(GalleryCommand::ExpansionFinished {
                    position: capture.position,
                    expanded: false,
                });
                Some(false)
            }
        }
    }

    /// Advances the animation. Returns `true` on the frame the overlay has
    /// fully collapsed again.
    pub fn tick(&mut self, now: Time, probe: &dyn LayoutProbe, commands: &mut Vec<GalleryCommand>) -> bool {
        let Some(capture) = self.capture else {
            return false;
        };
        match self.phase {
            ExpansionPhase::AwaitingFullLayout => {
                let height = probe.rendered_height(LayoutTarget::Full {
                    position: capture.position,
                });
                if height > 0.0 {
                    self.phase = ExpansionPhase::Expanding { start: now };
                    commands.push(GalleryCommand::ExpandStarted {
                        position: capture.position,
                        from: capture.origin,
                        to: capture.viewport,
                        duration_ms: capture.duration_ms,
                    });
                }
                false
            }
            ExpansionPhase::Expanding { start } => {
                if now.since(start) >= capture.duration_ms {
                    self.phase = ExpansionPhase::Expanded;
                    commands.push(GalleryCommand::ExpansionFinished {
                        position: capture.position,
                        expanded: true,
                    });
                }
                false
            }
            ExpansionPhase::Collapsing { start, .. } => {
                if now.since(start) >= capture.duration_ms {
                    self.reset();
                    commands.push(GalleryCommand::ExpansionFinished {
                        position: capture.position,
                        expanded: false,
                    });
                    tracing::debug!(position = capture.position, "expansion: collapsed");
                    return true;
                }
                false
            }
            ExpansionPhase::Collapsed | ExpansionPhase::LoadingFull { .. } | ExpansionPhase::Expanded => false,
        }
    }

    /// Starts shrinking back to the captured rect. Before the overlay has
    /// started growing this simply cancels and reports `true`.
    pub fn collapse(&mut self, now: Time, commands: &mut Vec<GalleryCommand>) -> bool {
        let Some(capture) = self.capture else {
            return false;
        };
        match self.phase {
            ExpansionPhase::LoadingFull { .. } | ExpansionPhase::AwaitingFullLayout => {
                self.reset();
                commands.push(GalleryCommand::ExpansionFinished {
                    position: capture.position,
                    expanded: false,
                });
                true
            }
            ExpansionPhase::Expanding { .. } | ExpansionPhase::Expanded => {
                let from = self.overlay_rect(now).unwrap_or(capture.viewport);
                self.phase = ExpansionPhase::Collapsing { start: now, from };
                commands.push(GalleryCommand::CollapseStarted {
                    position: capture.position,
                    to: capture.origin,
                    duration_ms: capture.duration_ms,
                });
                false
            }
            ExpansionPhase::Collapsed | ExpansionPhase::Collapsing { .. } => false,
        }
    }

    /// Current overlay rect while it is visible.
    pub fn overlay_rect(&self, now: Time) -> Option<Rect> {
        let capture = self.capture?;
        let progress = |start: Time| {
            if capture.duration_ms > 0.0 {
                now.since(start) / capture.duration_ms
            } else {
                1.0
            }
        };
        match self.phase {
            ExpansionPhase::Expanding { start } => {
                Some(capture.origin.lerp(capture.viewport, progress(start)))
            }
            ExpansionPhase::Expanded => Some(capture.viewport),
            ExpansionPhase::Collapsing { start, from } => {
                Some(from.lerp(capture.origin, progress(start)))
            }
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.phase = ExpansionPhase::Collapsed;
        self.capture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{Expansion, ExpansionPhase, ExpansionSpeed, ExpansionTiming};
    use crate::command::GalleryCommand;
    use crate::layout::LayoutTarget;
    use crate::request::{LoadOutcome, TicketIssuer};
    use foundation::bounds::Rect;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    const ORIGIN: Rect = Rect {
        x: 100.0,
        y: 200.0,
        width: 50.0,
        height: 40.0,
    };
    const VIEWPORT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1000.0,
        height: 800.0,
    };

    fn laid_out(_: LayoutTarget) -> f64 {
        300.0
    }

    #[test]
    fn preloaded_image_expands_and_collapses() {
        let mut e = Expansion::default();
        let mut issuer = TicketIssuer::new();
        let mut out = Vec::new();
        let ms = ExpansionTiming::default().duration_ms(ExpansionSpeed::Normal);
        assert!(e.begin(1, ORIGIN, VIEWPORT, ms, "full.jpg".into(), true, &mut issuer, &mut out));
        assert_eq!(issuer.latest(), None);
        assert_eq!(e.phase(), ExpansionPhase::AwaitingFullLayout);

        e.tick(Time(0.0), &laid_out, &mut out);
        assert_eq!(e.overlay_rect(Time(150.0)), Some(Rect::new(50.0, 100.0, 525.0, 420.0)));
        e.tick(Time(300.0), &laid_out, &mut out);
        assert_eq!(e.phase(), ExpansionPhase::Expanded);

        assert!(!e.collapse(Time(1000.0), &mut out));
        assert!(!e.tick(Time(1299.0), &laid_out, &mut out));
        assert!(e.tick(Time(1300.0), &laid_out, &mut out));
        assert!(e.is_collapsed());
        assert_eq!(
            out.last(),
            Some(&GalleryCommand::ExpansionFinished {
                position: 1,
                expanded: false
            })
        );
    }

    #[test]
    fn missing_full_image_is_loaded_first() {
        let mut e = Expansion::default();
        let mut issuer = TicketIssuer::new();
        let mut out = Vec::new();
        let ms = ExpansionTiming::default().duration_ms(ExpansionSpeed::Slow);
        e.begin(0, ORIGIN, VIEWPORT, ms, "full.jpg".into(), false, &mut issuer, &mut out);
        let ticket = issuer.latest().unwrap();
        assert!(matches!(out[0], GalleryCommand::LoadFullImage { .. }));

        // Not laid out until the load lands.
        e.tick(Time(10.0), &laid_out, &mut out);
        assert!(matches!(e.phase(), ExpansionPhase::LoadingFull { .. }));
        assert_eq!(e.on_load(ticket, &LoadOutcome::Loaded, &mut out), Some(true));
        e.tick(Time(20.0), &laid_out, &mut out);
        e.tick(Time(619.0), &laid_out, &mut out);
        assert!(matches!(e.phase(), ExpansionPhase::Expanding { .. }));
        e.tick(Time(620.0), &laid_out, &mut out);
        assert_eq!(e.phase(), ExpansionPhase::Expanded);
    }

    #[test]
    fn failed_full_image_stays_collapsed() {
        let mut e = Expansion::default();
        let mut issuer = TicketIssuer::new();
        let mut out = Vec::new();
        e.begin(2, ORIGIN, VIEWPORT, 300.0, "full.jpg".into(), false, &mut issuer, &mut out);
        let ticket = issuer.latest().unwrap();
        assert_eq!(e.on_load(ticket, &LoadOutcome::failed("timeout"), &mut out), Some(false));
        assert!(e.is_collapsed());
        assert_eq!(e.position(), None);
    }
}
