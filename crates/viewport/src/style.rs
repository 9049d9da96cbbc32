use serde::Serialize;

use crate::device::DeviceClass;

/// Global style derived from the current scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedStyle {
    pub pixel_ratio: f64,
    pub device: DeviceClass,
    pub body: BodyStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BodyStyle {
    /// Desktop: the page is laid out `ratio` times larger and scaled back down.
    Scaled { scale: f64, size_percent: f64 },
    /// Mobile: native viewport, no transform.
    Native,
}

impl AppliedStyle {
    pub fn new(pixel_ratio: f64, device: DeviceClass) -> Self {
        let body = match device {
            DeviceClass::Desktop => BodyStyle::Scaled {
                scale: 1.0 / pixel_ratio,
                size_percent: 100.0 * pixel_ratio,
            },
            DeviceClass::Mobile => BodyStyle::Native,
        };
        Self {
            pixel_ratio,
            device,
            body,
        }
    }

    /// Custom properties for the document root.
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![("--pixel-ratio", format_number(self.pixel_ratio))]
    }

    /// Inline declarations for the body element. Empty values clear a property.
    pub fn body_declarations(&self) -> Vec<(&'static str, String)> {
        match self.body {
            BodyStyle::Scaled {
                scale,
                size_percent,
            } => vec![
                ("transform", format!("scale({})", format_number(scale))),
                ("transform-origin", "top left".to_string()),
                ("width", format!("{}%", format_number(size_percent))),
                ("height", format!("{}%", format_number(size_percent))),
                ("overflow", String::new()),
            ],
            BodyStyle::Native => vec![
                ("transform", String::new()),
                ("transform-origin", String::new()),
                ("width", "100vw".to_string()),
                ("height", "100vh".to_string()),
                ("overflow", "hidden".to_string()),
            ],
        }
    }
}

fn format_number(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Receives global style updates (CSS variables, body transform, device class).
pub trait StyleSink {
    fn apply(&mut self, style: &AppliedStyle);
}

/// Discards style updates; for hosts that render scale themselves.
#[derive(Debug, Default)]
pub struct NullStyleSink;

impl StyleSink for NullStyleSink {
    fn apply(&mut self, _style: &AppliedStyle) {}
}
