//! Startup configuration: the itinerary, map camera, image origins and every
//! timing constant, with serde defaults for all of it.

use card::{TextQueueConfig, WelcomeTiming};
use foundation::math::LonLat;
use gallery::{GalleryConfig, ImageSources};
use route::{
    AnimatorConfig, ControlOffset, CurveSegment, CurveTable, Route, RouteError, Waypoint,
    WaypointSet,
};
use serde::{Deserialize, Serialize};
use viewport::ScaleConfig;

pub const ENV_MAPBOX_TOKEN: &str = "CORUMAP_MAPBOX_TOKEN";
pub const ENV_CDN_BASE: &str = "CORUMAP_CDN_BASE";
pub const ENV_FORCE_CACHE_REFRESH: &str = "CORUMAP_FORCE_CACHE_REFRESH";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Route(RouteError),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Route(err) => write!(f, "invalid itinerary: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Route(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RouteError> for ConfigError {
    fn from(err: RouteError) -> Self {
        ConfigError::Route(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointConfig {
    pub id: u32,
    pub name: String,
    /// `[lon, lat]`.
    pub coordinates: [f64; 2],
}

impl WaypointConfig {
    fn new(id: u32, name: &str, lon: f64, lat: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            coordinates: [lon, lat],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStyle {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub hide_all_labels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub access_token: Option<String>,
    pub zoom: f64,
    pub center: [f64; 2],
    /// Centre of the square the camera is fitted to.
    pub bounds_center: [f64; 2],
    pub fit_padding_px: f64,
    pub load_timeout_ms: f64,
    pub reload_delay_ms: f64,
    pub styles: Vec<MapStyle>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            zoom: 12.0,
            center: [-8.409610, 43.378497],
            bounds_center: [-8.408580, 43.375986],
            fit_padding_px: 20.0,
            load_timeout_ms: 10_000.0,
            reload_delay_ms: 5_000.0,
            styles: default_styles(),
        }
    }
}

fn default_styles() -> Vec<MapStyle> {
    vec![
        MapStyle {
            url: "mapbox://styles/mapbox/satellite-v9".to_string(),
            name: "Satellite v9".to_string(),
            hide_all_labels: false,
        },
        MapStyle {
            url: "mapbox://styles/mapbox/navigation-night-v1".to_string(),
            name: "Night-1".to_string(),
            hide_all_labels: true,
        },
        MapStyle {
            url: "mapbox://styles/mapbox/dark-v11".to_string(),
            name: "Night-2".to_string(),
            hide_all_labels: true,
        },
    ]
}

/// Staggered reveal of the markers; navigation waits until it is over.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntroTiming {
    pub per_marker_ms: f64,
    pub tail_ms: f64,
}

impl Default for IntroTiming {
    fn default() -> Self {
        Self {
            per_marker_ms: 125.0,
            tail_ms: 600.0,
        }
    }
}

impl IntroTiming {
    pub fn total_ms(&self, markers: usize) -> f64 {
        markers as f64 * self.per_marker_ms + self.tail_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowcaseConfig {
    pub map: MapConfig,
    pub waypoints: Vec<WaypointConfig>,
    pub curves: Vec<CurveSegment>,
    pub images: ImageSources,
    /// Adds a per-session `?v=` token to full-resolution URLs.
    pub force_cache_refresh: bool,
    pub animator: AnimatorConfig,
    pub gallery: GalleryConfig,
    pub scale: ScaleConfig,
    pub text_queue: TextQueueConfig,
    pub welcome: WelcomeTiming,
    pub intro: IntroTiming,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            waypoints: default_waypoints(),
            curves: default_curves(),
            images: ImageSources::default(),
            force_cache_refresh: false,
            animator: AnimatorConfig::default(),
            gallery: GalleryConfig::default(),
            scale: ScaleConfig::default(),
            text_queue: TextQueueConfig::default(),
            welcome: WelcomeTiming::default(),
            intro: IntroTiming::default(),
        }
    }
}

fn default_waypoints() -> Vec<WaypointConfig> {
    vec![
        WaypointConfig::new(1, "Torre de Hércules", -8.406350, 43.385830),
        WaypointConfig::new(2, "Playa del Orzán", -8.404000, 43.372000),
        WaypointConfig::new(3, "Plaza de María Pita", -8.396000, 43.371000),
        WaypointConfig::new(4, "Jardín de San Carlos", -8.393000, 43.370000),
        WaypointConfig::new(5, "Castillo de San Antón", -8.389900, 43.366200),
        WaypointConfig::new(6, "Obelisco", -8.400500, 43.368200),
        WaypointConfig::new(7, "Plaza de Pontevedra", -8.408000, 43.366000),
        WaypointConfig::new(8, "Estadio de Riazor", -8.417500, 43.368700),
        WaypointConfig::new(9, "Domus", -8.411500, 43.378700),
        WaypointConfig::new(10, "Aquarium Finisterrae", -8.408500, 43.381700),
    ]
}

fn default_curves() -> Vec<CurveSegment> {
    let c = ControlOffset::new;
    vec![
        CurveSegment::new(c(0.5, -0.3), c(0.6, 0.5)),
        CurveSegment::new(c(-0.2, 0.6), c(0.8, 0.3)),
        CurveSegment::with_end_control(c(0.5, 0.45), c(0.95, 0.45), c(0.94, 0.2)),
        CurveSegment::new(c(0.6, 0.2), c(0.2, -0.3)),
        CurveSegment::new(c(0.3, -0.3), c(0.8, -0.4)),
        CurveSegment::new(c(-0.3, 1.3), c(0.9, -0.7)),
        CurveSegment::new(c(0.3, -0.2), c(0.8, 0.4)),
        CurveSegment::new(c(0.5, -0.2), c(0.2, 0.4)),
        CurveSegment::new(c(0.2, 0.3), c(0.6, -0.5)),
    ]
}

impl ShowcaseConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overrides fields from environment-style variables supplied by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_MAPBOX_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.map.access_token = Some(token);
        }
        if let Some(base) = lookup(ENV_CDN_BASE).filter(|b| !b.trim().is_empty()) {
            self.images.cdn_base = base;
        }
        if let Some(flag) = lookup(ENV_FORCE_CACHE_REFRESH) {
            self.force_cache_refresh = matches!(flag.trim(), "1" | "true" | "yes");
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Image origins for one page session. `session_token` becomes the
    /// cache-buster when refresh is forced and none is configured.
    pub fn image_sources(&self, session_token: &str) -> ImageSources {
        let mut sources = self.images.clone();
        if self.force_cache_refresh && sources.cache_buster.is_none() {
            sources.cache_buster = Some(session_token.to_string());
        }
        sources
    }

    pub fn route(&self) -> Result<Route, ConfigError> {
        let waypoints = self
            .waypoints
            .iter()
            .map(|w| {
                Waypoint::new(
                    w.id,
                    w.name.clone(),
                    LonLat::new(w.coordinates[0], w.coordinates[1]),
                )
            })
            .collect();
        let waypoints = WaypointSet::new(waypoints)?;
        Ok(Route::new(waypoints, CurveTable::new(self.curves.clone()))?)
    }

    /// Checks everything that would otherwise fail later, and returns the
    /// validated itinerary.
    pub fn validate(&self) -> Result<Route, ConfigError> {
        let route = self.route()?;
        if route.len() < 2 {
            return Err(ConfigError::Invalid(
                "at least two waypoints are required".to_string(),
            ));
        }
        if self.images.cdn_base.trim().is_empty() {
            return Err(ConfigError::Invalid("cdn base is empty".to_string()));
        }
        if self.map.styles.is_empty() {
            return Err(ConfigError::Invalid("no map styles configured".to_string()));
        }
        let timings = [
            ("animator.msPerWaypoint", self.animator.duration.ms_per_waypoint),
            ("animator.minDurationMs", self.animator.duration.min_duration_ms),
            ("map.loadTimeoutMs", self.map.load_timeout_ms),
            ("welcome.expandMs", self.welcome.expand_ms),
            ("welcome.collapseMs", self.welcome.collapse_ms),
            ("gallery.normal.crossfadeMs", self.gallery.normal.crossfade_ms),
            ("gallery.fast.crossfadeMs", self.gallery.fast.crossfade_ms),
        ];
        for (name, value) in timings {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.gallery.positions == 0 {
            return Err(ConfigError::Invalid("gallery needs at least one position".to_string()));
        }
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn defaults_validate() {
        let config = ShowcaseConfig::default();
        let route = config.validate().unwrap();
        assert_eq!(route.len(), 10);
        assert_eq!(route.curves().len(), 9);
        assert!(route.curves().segments()[2].cp3.is_some());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ShowcaseConfig::from_json(
            r#"{ "map": { "zoom": 13 }, "forceCacheRefresh": true, "animator": { "msPerWaypoint": 5000 } }"#,
        )
        .unwrap();
        assert_eq!(config.map.zoom, 13.0);
        assert_eq!(config.map.load_timeout_ms, 10_000.0);
        assert!(config.force_cache_refresh);
        assert_eq!(config.animator.duration.ms_per_waypoint, 5000.0);
        assert_eq!(config.animator.duration.min_duration_ms, 4000.0);
        assert_eq!(config.waypoints.len(), 10);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        assert!(matches!(
            ShowcaseConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides() {
        let env: BTreeMap<&str, &str> = [
            (ENV_MAPBOX_TOKEN, "pk.test"),
            (ENV_CDN_BASE, "https://cdn.example.org/img"),
            (ENV_FORCE_CACHE_REFRESH, "true"),
        ]
        .into_iter()
        .collect();
        let mut config = ShowcaseConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.map.access_token.as_deref(), Some("pk.test"));
        assert_eq!(config.images.cdn_base, "https://cdn.example.org/img");

        let sources = config.image_sources("abc");
        assert_eq!(sources.cache_buster.as_deref(), Some("abc"));
    }

    #[test]
    fn curve_count_mismatch_is_reported() {
        let mut config = ShowcaseConfig::default();
        config.curves.pop();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::Route(RouteError::CurveCountMismatch {
                expected: 9,
                found: 8
            })
        );
    }

    #[test]
    fn non_positive_timing_is_rejected() {
        let mut config = ShowcaseConfig::default();
        config.map.load_timeout_ms = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
