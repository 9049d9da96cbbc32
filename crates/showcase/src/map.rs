//! Load lifecycle of the external map and the camera framing around it.

use foundation::bounds::Aabb2;
use foundation::math::{LonLat, MercatorView};
use foundation::time::Time;
use runtime::timer::Delay;
use serde::Serialize;

use crate::config::MapConfig;

pub const TIMEOUT_MESSAGE: &str = "Map loading timeout - please check your internet connection";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum MapError {
    MissingToken,
    Timeout,
    Sdk(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::MissingToken => write!(f, "Mapbox access token is not configured"),
            MapError::Timeout => write!(f, "{TIMEOUT_MESSAGE}"),
            MapError::Sdk(msg) => write!(f, "Map error: {msg}"),
        }
    }
}

impl std::error::Error for MapError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "camelCase")]
pub enum MapStatus {
    Initializing,
    Ready,
    Failed(MapError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    Ready,
    Failed(MapError),
    ReloadRequested,
}

#[derive(Debug)]
pub struct MapLifecycle {
    status: MapStatus,
    watchdog: Delay,
    reload: Delay,
    reload_delay_ms: f64,
}

impl MapLifecycle {
    /// Starts waiting for the map. Without an access token the map fails
    /// straight away and no reload is scheduled.
    pub fn start(config: &MapConfig, now: Time) -> Self {
        let mut lifecycle = Self {
            status: MapStatus::Initializing,
            watchdog: Delay::idle(),
            reload: Delay::idle(),
            reload_delay_ms: config.reload_delay_ms,
        };
        let has_token = config
            .access_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if has_token {
            lifecycle.watchdog.start(now, config.load_timeout_ms);
        } else {
            tracing::warn!("map: no access token configured");
            lifecycle.status = MapStatus::Failed(MapError::MissingToken);
        }
        lifecycle
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == MapStatus::Ready
    }

    pub fn error(&self) -> Option<&MapError> {
        match &self.status {
            MapStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// SDK `load`, or the first `idle` if `load` never arrived.
    pub fn on_loaded(&mut self) -> Option<MapEvent> {
        if self.status != MapStatus::Initializing {
            return None;
        }
        self.watchdog.cancel();
        self.status = MapStatus::Ready;
        tracing::debug!("map: ready");
        Some(MapEvent::Ready)
    }

    pub fn on_error(&mut self, message: impl Into<String>, now: Time) -> Option<MapEvent> {
        if matches!(self.status, MapStatus::Failed(_)) {
            return None;
        }
        Some(self.fail(MapError::Sdk(message.into()), now))
    }

    pub fn tick(&mut self, now: Time) -> Option<MapEvent> {
        if self.watchdog.fire_if_due(now) && self.status == MapStatus::Initializing {
            return Some(self.fail(MapError::Timeout, now));
        }
        if self.reload.fire_if_due(now) {
            tracing::debug!("map: requesting page reload");
            return Some(MapEvent::ReloadRequested);
        }
        None
    }

    fn fail(&mut self, err: MapError, now: Time) -> MapEvent {
        tracing::warn!(error = %err, "map: failed");
        self.watchdog.cancel();
        self.reload.start(now, self.reload_delay_ms);
        self.status = MapStatus::Failed(err.clone());
        MapEvent::Failed(err)
    }
}

/// Square around the configured centre whose half-size halves with each
/// zoom level above 12.
pub fn city_bounds(config: &MapConfig) -> Aabb2 {
    let factor = 2f64.powf(12.0 - config.zoom) * 0.02;
    Aabb2::around(config.bounds_center, factor)
}

/// Camera for a viewport of the given size, framed on [`city_bounds`].
pub fn fitted_view(config: &MapConfig, width: f64, height: f64) -> MercatorView {
    let center = LonLat::new(config.center[0], config.center[1]);
    let mut view = MercatorView::new(center, config.zoom, width, height);
    view.fit_bounds(city_bounds(config), config.fit_padding_px);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_with_token() -> MapConfig {
        MapConfig {
            access_token: Some("pk.test".to_string()),
            ..MapConfig::default()
        }
    }

    #[test]
    fn load_before_timeout_is_ready() {
        let mut map = MapLifecycle::start(&config_with_token(), Time(0.0));
        assert_eq!(map.status(), &MapStatus::Initializing);
        assert_eq!(map.on_loaded(), Some(MapEvent::Ready));
        assert_eq!(map.on_loaded(), None);
        assert_eq!(map.tick(Time(20_000.0)), None);
        assert!(map.is_ready());
    }

    #[test]
    fn timeout_fails_then_requests_reload_once() {
        let mut map = MapLifecycle::start(&config_with_token(), Time(0.0));
        assert_eq!(map.tick(Time(9_999.0)), None);
        assert_eq!(map.tick(Time(10_000.0)), Some(MapEvent::Failed(MapError::Timeout)));
        assert_eq!(map.error().map(|e| e.to_string()).as_deref(), Some(TIMEOUT_MESSAGE));
        // A late load does not revive the map.
        assert_eq!(map.on_loaded(), None);
        assert_eq!(map.tick(Time(14_999.0)), None);
        assert_eq!(map.tick(Time(15_000.0)), Some(MapEvent::ReloadRequested));
        assert_eq!(map.tick(Time(30_000.0)), None);
    }

    #[test]
    fn sdk_error_fails() {
        let mut map = MapLifecycle::start(&config_with_token(), Time(0.0));
        let event = map.on_error("style not found", Time(100.0));
        assert_eq!(event, Some(MapEvent::Failed(MapError::Sdk("style not found".into()))));
        assert_eq!(map.on_error("again", Time(200.0)), None);
        assert_eq!(map.tick(Time(5_099.0)), None);
        assert_eq!(map.tick(Time(5_100.0)), Some(MapEvent::ReloadRequested));
    }

    #[test]
    fn missing_token_fails_immediately_without_reload() {
        let mut map = MapLifecycle::start(&MapConfig::default(), Time(0.0));
        assert_eq!(map.error(), Some(&MapError::MissingToken));
        assert_eq!(map.tick(Time(60_000.0)), None);
    }

    #[test]
    fn bounds_shrink_with_zoom() {
        let mut config = MapConfig::default();
        let at_12 = city_bounds(&config);
        assert!((at_12.max[0] - at_12.min[0] - 0.04).abs() < 1e-12);
        config.zoom = 13.0;
        let at_13 = city_bounds(&config);
        assert!((at_13.max[1] - at_13.min[1] - 0.02).abs() < 1e-12);
        let c = at_13.center();
        assert!((c[0] - config.bounds_center[0]).abs() < 1e-12);
        assert!((c[1] - config.bounds_center[1]).abs() < 1e-12);
    }

    #[test]
    fn fitted_view_contains_bounds() {
        use foundation::math::Projector;
        let config = MapConfig::default();
        let view = fitted_view(&config, 1280.0, 720.0);
        let b = city_bounds(&config);
        for corner in [LonLat::new(b.min[0], b.min[1]), LonLat::new(b.max[0], b.max[1])] {
            let p = view.project(corner);
            assert!(p.x >= 19.0 && p.x <= 1261.0, "{p:?}");
            assert!(p.y >= 19.0 && p.y <= 701.0, "{p:?}");
        }
    }
}
