use foundation::time::Time;
use runtime::timer::Debounce;
use serde::Serialize;

use crate::device::{DeviceClass, DeviceInfo, Resolution, detect_device_class};
use crate::scale::ScaleConfig;
use crate::style::{AppliedStyle, StyleSink};

/// Read-only view of the current scale, handed to anything that positions
/// screen-space elements.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportContext {
    pub scale: f64,
    pub device: DeviceClass,
}

impl ViewportContext {
    pub fn is_mobile(&self) -> bool {
        self.device.is_mobile()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleChangeReason {
    Initial,
    Resize,
    Override,
    AutoThresholds,
}

/// Emitted every time style is (re)applied.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleChange {
    pub context: ViewportContext,
    pub resolution: Resolution,
    pub reason: ScaleChangeReason,
}

/// Owns scale and device-class state for one application run.
///
/// Resizes are debounced: [`ScaleManager::on_resize`] only records the new
/// size, and [`ScaleManager::tick`] re-applies once the window has been quiet
/// for `resize_quiet_ms`. Each settled burst produces exactly one change.
#[derive(Debug)]
pub struct ScaleManager {
    config: ScaleConfig,
    device_info: DeviceInfo,
    resolution: Resolution,
    pending_resolution: Option<Resolution>,
    context: ViewportContext,
    auto_thresholds: bool,
    resize: Debounce,
    initialized: bool,
}

impl ScaleManager {
    pub fn new(config: ScaleConfig) -> Self {
        let context = ViewportContext {
            scale: config.fallback_pixel_ratio,
            device: DeviceClass::Desktop,
        };
        let resize = Debounce::new(config.resize_quiet_ms.max(100.0));
        Self {
            config,
            device_info: DeviceInfo::default(),
            resolution: Resolution::default(),
            pending_resolution: None,
            context,
            auto_thresholds: true,
            resize,
            initialized: false,
        }
    }

    pub fn initialize(
        &mut self,
        device_info: DeviceInfo,
        resolution: Resolution,
        sink: &mut dyn StyleSink,
    ) -> ScaleChange {
        self.device_info = device_info;
        self.resolution = resolution;
        self.pending_resolution = None;
        self.resize.cancel();
        self.initialized = true;
        self.recompute(ScaleChangeReason::Initial, sink)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn on_resize(&mut self, resolution: Resolution, now: Time) {
        self.pending_resolution = Some(resolution);
        self.resize.poke(now);
    }

    /// Whether a resize burst is still settling.
    pub fn is_resizing(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn tick(&mut self, now: Time, sink: &mut dyn StyleSink) -> Option<ScaleChange> {
        if !self.resize.fire_if_due(now) {
            return None;
        }
        if let Some(resolution) = self.pending_resolution.take() {
            self.resolution = resolution;
        }
        if !self.initialized {
            return None;
        }
        Some(self.recompute(ScaleChangeReason::Resize, sink))
    }

    /// Pins the ratio and stops following the resolution table.
    pub fn set_pixel_ratio(&mut self, ratio: f64, sink: &mut dyn StyleSink) -> ScaleChange {
        self.auto_thresholds = false;
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            self.config.fallback_pixel_ratio
        };
        self.context.scale = ratio;
        self.apply(ScaleChangeReason::Override, sink)
    }

    pub fn set_auto_thresholds(
        &mut self,
        enabled: bool,
        sink: &mut dyn StyleSink,
    ) -> Option<ScaleChange> {
        self.auto_thresholds = enabled;
        if enabled {
            Some(self.recompute(ScaleChangeReason::AutoThresholds, sink))
        } else {
            None
        }
    }

    pub fn is_auto_thresholds_enabled(&self) -> bool {
        self.auto_thresholds
    }

    pub fn scale(&self) -> f64 {
        self.context.scale
    }

    pub fn is_mobile(&self) -> bool {
        self.context.is_mobile()
    }

    pub fn context(&self) -> ViewportContext {
        self.context
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn recompute(&mut self, reason: ScaleChangeReason, sink: &mut dyn StyleSink) -> ScaleChange {
        self.context.device = detect_device_class(
            &self.device_info,
            self.resolution,
            self.config.mobile_max_short_side,
        );
        if self.auto_thresholds {
            self.context.scale = self
                .config
                .pixel_ratio_for(self.context.device, self.resolution);
        }
        self.apply(reason, sink)
    }

    fn apply(&mut self, reason: ScaleChangeReason, sink: &mut dyn StyleSink) -> ScaleChange {
        let style = AppliedStyle::new(self.context.scale, self.context.device);
        sink.apply(&style);
        tracing::debug!(
            scale = self.context.scale,
            device = ?self.context.device,
            width = self.resolution.width,
            height = self.resolution.height,
            ?reason,
            "applied viewport scale"
        );
        ScaleChange {
            context: self.context,
            resolution: self.resolution,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScaleChangeReason, ScaleManager};
    use crate::device::{DeviceClass, DeviceInfo, Resolution};
    use crate::scale::ScaleConfig;
    use crate::style::{AppliedStyle, StyleSink};
    use foundation::time::Time;

    #[derive(Default)]
    struct RecordingSink {
        applied: Vec<AppliedStyle>,
    }

    impl StyleSink for RecordingSink {
        fn apply(&mut self, style: &AppliedStyle) {
            self.applied.push(style.clone());
        }
    }

    fn desktop() -> DeviceInfo {
        DeviceInfo::new("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0", 0)
    }

    #[test]
    fn initialize_applies_table_ratio() {
        let mut sink = RecordingSink::default();
        let mut m = ScaleManager::new(ScaleConfig::default());
        let change = m.initialize(desktop(), Resolution::new(1920.0, 1080.0), &mut sink);
        assert_eq!(change.reason, ScaleChangeReason::Initial);
        assert_eq!(m.scale(), 3.0);
        assert!(!m.is_mobile());
        assert_eq!(sink.applied.len(), 1);
        assert_eq!(sink.applied[0].css_variables()[0].1, "3");
    }

    #[test]
    fn resize_fires_once_after_debounce_settles() {
        let mut sink = RecordingSink::default();
        let mut m = ScaleManager::new(ScaleConfig::default());
        m.initialize(desktop(), Resolution::new(1920.0, 1080.0), &mut sink);

        m.on_resize(Resolution::new(1200.0, 900.0), Time(0.0));
        m.on_resize(Resolution::new(800.0, 860.0), Time(40.0));
        m.on_resize(Resolution::new(390.0, 844.0), Time(80.0));

        assert!(m.tick(Time(120.0), &mut sink).is_none());
        let change = m.tick(Time(180.0), &mut sink).expect("settled");
        assert_eq!(change.reason, ScaleChangeReason::Resize);
        assert_eq!(change.resolution, Resolution::new(390.0, 844.0));
        assert_eq!(change.context.scale, 3.0);
        assert!(m.tick(Time(400.0), &mut sink).is_none());
        assert_eq!(sink.applied.len(), 2);
    }

    #[test]
    fn touch_device_becomes_mobile_when_narrowed() {
        let mut sink = RecordingSink::default();
        let mut m = ScaleManager::new(ScaleConfig::default());
        let touch_laptop = DeviceInfo::new("Mozilla/5.0 (Windows NT 10.0) Chrome/126.0", 10);
        m.initialize(touch_laptop, Resolution::new(1920.0, 1080.0), &mut sink);
        assert_eq!(m.context().device, DeviceClass::Desktop);

        m.on_resize(Resolution::new(390.0, 844.0), Time(0.0));
        let change = m.tick(Time(100.0), &mut sink).expect("settled");
        assert_eq!(change.context.device, DeviceClass::Mobile);
        assert_eq!(m.scale(), 1.5);
    }

    #[test]
    fn manual_override_survives_resize_until_auto_reenabled() {
        let mut sink = RecordingSink::default();
        let mut m = ScaleManager::new(ScaleConfig::default());
        m.initialize(desktop(), Resolution::new(1920.0, 1080.0), &mut sink);

        let change = m.set_pixel_ratio(4.0, &mut sink);
        assert_eq!(change.reason, ScaleChangeReason::Override);
        assert!(!m.is_auto_thresholds_enabled());

        m.on_resize(Resolution::new(2560.0, 1440.0), Time(0.0));
        m.tick(Time(100.0), &mut sink);
        assert_eq!(m.scale(), 4.0);

        m.set_auto_thresholds(true, &mut sink);
        assert_eq!(m.scale(), 2.5);
    }

    #[test]
    fn inconclusive_detection_uses_safe_default() {
        let mut sink = RecordingSink::default();
        let mut m = ScaleManager::new(ScaleConfig::default());
        m.initialize(desktop(), Resolution::new(0.0, 0.0), &mut sink);
        assert_eq!(m.scale(), 2.0);
    }

    #[test]
    fn quiet_period_is_at_least_100ms() {
        let mut sink = RecordingSink::default();
        let cfg = ScaleConfig {
            resize_quiet_ms: 10.0,
            ..ScaleConfig::default()
        };
        let mut m = ScaleManager::new(cfg);
        m.initialize(desktop(), Resolution::new(1920.0, 1080.0), &mut sink);
        m.on_resize(Resolution::new(1280.0, 720.0), Time(0.0));
        assert!(m.tick(Time(50.0), &mut sink).is_none());
        assert!(m.tick(Time(100.0), &mut sink).is_some());
    }
}
