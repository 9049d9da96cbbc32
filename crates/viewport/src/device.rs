use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }

    pub fn css_class(self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop-device",
            DeviceClass::Mobile => "mobile-device",
        }
    }
}

/// What the host can tell us about the browser / window system.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub user_agent: String,
    pub max_touch_points: u32,
}

impl DeviceInfo {
    pub fn new(user_agent: impl Into<String>, max_touch_points: u32) -> Self {
        Self {
            user_agent: user_agent.into(),
            max_touch_points,
        }
    }

    pub fn has_touch(&self) -> bool {
        self.max_touch_points > 0
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: f64,
    pub height: f64,
}

impl Resolution {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero, negative or non-finite sizes mean the host could not measure.
    pub fn is_conclusive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn short_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

const MOBILE_AGENT_MARKERS: &[&str] = &["android", "iphone", "ipad", "ipod", "mobile"];

/// Classifies the device from its user agent, falling back to touch
/// capability combined with a narrow viewport.
pub fn detect_device_class(
    info: &DeviceInfo,
    resolution: Resolution,
    mobile_max_short_side: f64,
) -> DeviceClass {
    let agent = info.user_agent.to_ascii_lowercase();
    if MOBILE_AGENT_MARKERS.iter().any(|m| agent.contains(m)) {
        return DeviceClass::Mobile;
    }
    if info.has_touch()
        && resolution.is_conclusive()
        && resolution.short_side() <= mobile_max_short_side
    {
        return DeviceClass::Mobile;
    }
    DeviceClass::Desktop
}
