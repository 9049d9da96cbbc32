use serde::{Deserialize, Serialize};

use crate::device::{DeviceClass, Resolution};

/// One row of the resolution → pixel-ratio lookup table.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionThreshold {
    /// `None` means unbounded.
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub pixel_ratio: f64,
}

impl ResolutionThreshold {
    pub const fn new(max_width: f64, max_height: f64, pixel_ratio: f64) -> Self {
        Self {
            max_width: Some(max_width),
            max_height: Some(max_height),
            pixel_ratio,
        }
    }

    pub const fn unbounded(pixel_ratio: f64) -> Self {
        Self {
            max_width: None,
            max_height: None,
            pixel_ratio,
        }
    }

    fn contains(&self, resolution: Resolution) -> bool {
        self.max_width.is_none_or(|w| resolution.width <= w)
            && self.max_height.is_none_or(|h| resolution.height <= h)
    }
}

/// Smaller screens get a larger ratio so the fixed-size layout is scaled down
/// less aggressively.
pub const DEFAULT_THRESHOLDS: [ResolutionThreshold; 5] = [
    ResolutionThreshold::new(1280.0, 720.0, 3.25),
    ResolutionThreshold::new(1920.0, 1080.0, 3.0),
    ResolutionThreshold::new(2560.0, 1440.0, 2.5),
    ResolutionThreshold::new(3840.0, 2160.0, 2.0),
    ResolutionThreshold::unbounded(2.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScaleConfig {
    pub thresholds: Vec<ResolutionThreshold>,
    pub mobile_pixel_ratio: f64,
    /// Used whenever the resolution cannot be measured or no row matches.
    pub fallback_pixel_ratio: f64,
    pub resize_quiet_ms: f64,
    /// Touch devices whose short side is at most this many pixels count as mobile.
    pub mobile_max_short_side: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            mobile_pixel_ratio: 1.5,
            fallback_pixel_ratio: 2.0,
            resize_quiet_ms: 100.0,
            mobile_max_short_side: 768.0,
        }
    }
}

impl ScaleConfig {
    pub fn pixel_ratio_for(&self, device: DeviceClass, resolution: Resolution) -> f64 {
        if device.is_mobile() {
            return self.mobile_pixel_ratio;
        }
        if !resolution.is_conclusive() {
            return self.fallback_pixel_ratio;
        }
        self.thresholds
            .iter()
            .find(|t| t.contains(resolution))
            .map(|t| t.pixel_ratio)
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(self.fallback_pixel_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::ScaleConfig;
    use crate::device::{DeviceClass, Resolution};

    #[test]
    fn table_lookup_picks_first_fitting_row() {
        let cfg = ScaleConfig::default();
        let d = DeviceClass::Desktop;
        assert_eq!(cfg.pixel_ratio_for(d, Resolution::new(1280.0, 720.0)), 3.25);
        assert_eq!(cfg.pixel_ratio_for(d, Resolution::new(1920.0, 1080.0)), 3.0);
        assert_eq!(cfg.pixel_ratio_for(d, Resolution::new(390.0, 844.0)), 3.0);
        assert_eq!(cfg.pixel_ratio_for(d, Resolution::new(2560.0, 1440.0)), 2.5);
        assert_eq!(cfg.pixel_ratio_for(d, Resolution::new(3000.0, 2000.0)), 2.0);
        assert_eq!(cfg.pixel_ratio_for(d, Resolution::new(7680.0, 4320.0)), 2.0);
    }

    #[test]
    fn mobile_uses_fixed_ratio() {
        let cfg = ScaleConfig::default();
        let r = cfg.pixel_ratio_for(DeviceClass::Mobile, Resolution::new(1920.0, 1080.0));
        assert_eq!(r, 1.5);
    }

    #[test]
    fn inconclusive_resolution_falls_back() {
        let cfg = ScaleConfig::default();
        let r = cfg.pixel_ratio_for(DeviceClass::Desktop, Resolution::new(0.0, 0.0));
        assert_eq!(r, 2.0);
    }

    #[test]
    fn empty_table_falls_back() {
        let cfg = ScaleConfig {
            thresholds: Vec::new(),
            ..ScaleConfig::default()
        };
        let r = cfg.pixel_ratio_for(DeviceClass::Desktop, Resolution::new(800.0, 600.0));
        assert_eq!(r, 2.0);
    }
}
