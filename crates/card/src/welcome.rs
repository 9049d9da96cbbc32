use foundation::bounds::Rect;
use foundation::time::Time;
use runtime::timer::{Debounce, Delay};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WelcomePhase {
    Idle,
    Preparing,
    Expanding,
    Collapsing,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WelcomeTiming {
    pub expand_ms: f64,
    pub collapse_ms: f64,
    /// How long the dimming overlay stays up once collapsing starts.
    pub overlay_linger_ms: f64,
    /// Transitions are suppressed until resizing has been quiet this long.
    pub resize_freeze_ms: f64,
}

impl Default for WelcomeTiming {
    fn default() -> Self {
        Self {
            expand_ms: 520.0,
            collapse_ms: 400.0,
            overlay_linger_ms: 200.0,
            resize_freeze_ms: 100.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WelcomeEvent {
    Expanded,
    Collapsed,
}

/// Everything the host needs to render the card this frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeView {
    pub phase: WelcomePhase,
    pub expanded: bool,
    pub overlay_visible: bool,
    pub overlay_fading_out: bool,
    pub transitions_enabled: bool,
    /// Rect the card grows out of and shrinks back into.
    pub origin: Option<Rect>,
}

/// Expand/collapse lifecycle of the welcome card.
#[derive(Debug)]
pub struct WelcomeCard {
    timing: WelcomeTiming,
    phase: WelcomePhase,
    expanded: bool,
    origin: Option<Rect>,
    phase_done: Delay,
    overlay_fade: Delay,
    overlay_fading_out: bool,
    resize_freeze: Debounce,
    transitions_enabled: bool,
}

impl WelcomeCard {
    pub fn new(timing: WelcomeTiming) -> Self {
        Self {
            timing,
            phase: WelcomePhase::Idle,
            expanded: false,
            origin: None,
            phase_done: Delay::idle(),
            overlay_fade: Delay::idle(),
            overlay_fading_out: false,
            resize_freeze: Debounce::new(timing.resize_freeze_ms),
            transitions_enabled: true,
        }
    }

    pub fn phase(&self) -> WelcomePhase {
        self.phase
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Opens the card from `origin`, or closes it when already open.
    pub fn toggle(&mut self, origin: Rect, now: Time) -> bool {
        if self.phase != WelcomePhase::Idle || self.expanded {
            return self.expanded && self.close(now);
        }
        self.origin = Some(origin);
        self.overlay_fading_out = false;
        self.overlay_fade.cancel();
        self.transitions_enabled = true;
        self.resize_freeze.cancel();
        self.phase = WelcomePhase::Preparing;
        self.phase_done.restart(now, self.timing.expand_ms);
        tracing::debug!("welcome: expanding");
        true
    }

    /// Starts collapsing. Ignored while preparing or already collapsing.
    pub fn close(&mut self, now: Time) -> bool {
        let closable = matches!(self.phase, WelcomePhase::Idle | WelcomePhase::Expanding);
        if !closable || !self.expanded {
            return false;
        }
        self.expanded = false;
        self.overlay_fading_out = true;
        self.transitions_enabled = true;
        self.resize_freeze.cancel();
        self.phase = WelcomePhase::Collapsing;
        self.overlay_fade.restart(now, self.timing.overlay_linger_ms);
        self.phase_done.restart(now, self.timing.collapse_ms);
        tracing::debug!("welcome: collapsing");
        true
    }

    pub fn on_resize(&mut self, now: Time) {
        self.transitions_enabled = false;
        self.resize_freeze.poke(now);
    }

    pub fn tick(&mut self, now: Time) -> Option<WelcomeEvent> {
        if self.phase == WelcomePhase::Preparing {
            self.phase = WelcomePhase::Expanding;
            self.expanded = true;
        }
        if self.resize_freeze.fire_if_due(now) {
            self.transitions_enabled = true;
        }
        if self.overlay_fade.fire_if_due(now) {
            self.overlay_fading_out = false;
        }
        if !self.phase_done.fire_if_due(now) {
            return None;
        }
        match std::mem::replace(&mut self.phase, WelcomePhase::Idle) {
            WelcomePhase::Collapsing => {
                self.origin = None;
                Some(WelcomeEvent::Collapsed)
            }
            WelcomePhase::Expanding | WelcomePhase::Preparing => Some(WelcomeEvent::Expanded),
            WelcomePhase::Idle => None,
        }
    }

    pub fn view(&self) -> WelcomeView {
        WelcomeView {
            phase: self.phase,
            expanded: self.expanded,
            overlay_visible: self.expanded || self.overlay_fading_out,
            overlay_fading_out: self.overlay_fading_out,
            transitions_enabled: self.transitions_enabled,
            origin: self.origin,
        }
    }
}
