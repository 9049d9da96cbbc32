use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use foundation::bounds::{Aabb2, Rect};
use foundation::ids::WaypointId;
use foundation::math::LonLat;
use foundation::time::Time;
use gallery::{LayoutTarget, LoadOutcome, LoadTicket};
use prefs::{InMemoryPreferenceStore, LocalStoragePreferenceStore, PreferenceStore};
use showcase::{MapStyle, Showcase, ShowcaseConfig, Startup, city_bounds};
use viewport::{DeviceInfo, Resolution};

mod dom;
use dom::{DomStyleSink, measure_with, project_with};

struct HostState {
    showcase: Showcase,
    store: Box<dyn PreferenceStore>,
    sink: DomStyleSink,
}

thread_local! {
    static STATE: RefCell<Option<HostState>> = const { RefCell::new(None) };
}

fn with_host<R>(f: impl FnOnce(&mut HostState) -> R) -> Result<R, JsValue> {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let host = state
            .as_mut()
            .ok_or_else(|| JsValue::from_str("showcase not started"))?;
        Ok(f(host))
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn open_store() -> Box<dyn PreferenceStore> {
    match LocalStoragePreferenceStore::new() {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!(error = %err, "localStorage unavailable, preferences last for this page only");
            Box::new(InMemoryPreferenceStore::new())
        }
    }
}

fn device_info() -> DeviceInfo {
    let navigator = web_sys::window().map(|w| w.navigator());
    let user_agent = navigator
        .as_ref()
        .and_then(|n| n.user_agent().ok())
        .unwrap_or_default();
    let touch_points = navigator
        .as_ref()
        .map(|n| n.max_touch_points())
        .unwrap_or(0);
    DeviceInfo::new(user_agent, touch_points.max(0) as u32)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

/// Fetches a JSON config document; pass the text on to [`start_showcase`].
#[wasm_bindgen]
pub async fn fetch_config(url: String) -> Result<String, JsValue> {
    let resp = Request::get(&url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "config fetch failed: HTTP {}",
            resp.status()
        )));
    }
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Builds the showcase. `config_json` may be empty for the built-in defaults;
/// `env` is a plain object of build-time variables (e.g. the map token).
#[wasm_bindgen]
pub fn start_showcase(
    config_json: Option<String>,
    env: JsValue,
    width: f64,
    height: f64,
    now: f64,
) -> Result<(), JsValue> {
    let mut config = match config_json.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            ShowcaseConfig::from_json(raw).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        _ => ShowcaseConfig::default(),
    };
    if !env.is_undefined() && !env.is_null() {
        let vars: BTreeMap<String, String> = serde_wasm_bindgen::from_value(env)?;
        config.apply_env(|key| vars.get(key).cloned());
    }

    let store = open_store();
    let mut sink = DomStyleSink;
    let session_token = format!("{}", js_sys::Date::now() as u64);
    let startup = Startup {
        device: device_info(),
        resolution: Resolution::new(width, height),
        session_token: &session_token,
        now: Time(now),
    };
    let showcase = Showcase::new(config, startup, store.as_ref(), &mut sink).map_err(|e| {
        let msg = JsValue::from_str(&format!("showcase init error: {e}"));
        web_sys::console::error_1(&msg);
        msg
    })?;

    STATE.with(|state| {
        *state.borrow_mut() = Some(HostState {
            showcase,
            store,
            sink,
        });
    });
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapSetup<'a> {
    access_token: Option<&'a str>,
    style: Option<&'a MapStyle>,
    center: [f64; 2],
    zoom: f64,
    bounds: Aabb2,
    fit_padding_px: f64,
    show_welcome: bool,
}

/// What the page needs to construct the map: token, style, camera and the
/// bounds to fit.
#[wasm_bindgen]
pub fn map_setup() -> Result<JsValue, JsValue> {
    with_host(|host| {
        let config = &host.showcase.config().map;
        to_js(&MapSetup {
            access_token: config.access_token.as_deref(),
            style: host.showcase.map_style(),
            center: config.center,
            zoom: config.zoom,
            bounds: city_bounds(config),
            fit_padding_px: config.fit_padding_px,
            show_welcome: host.showcase.should_show_welcome(),
        })
    })?
}

/// Advances one animation frame.
///
/// `project(lon, lat)` returns `[x, y]` from the map SDK, and
/// `measure(position, part)` returns a rendered height.
#[wasm_bindgen]
pub fn tick(now: f64, project: &js_sys::Function, measure: &js_sys::Function) -> Result<JsValue, JsValue> {
    let projector = |at: LonLat| project_with(project, at);
    let probe = |target: LayoutTarget| measure_with(measure, target);
    let frame = with_host(|host| {
        host.showcase
            .tick(Time(now), &projector, &probe, &mut host.sink)
    })?;
    to_js(&frame)
}

#[wasm_bindgen]
pub fn navigate_to(id: u32, now: f64) -> Result<bool, JsValue> {
    with_host(|host| host.showcase.navigate_to(WaypointId(id), Time(now)))
}

#[wasm_bindgen]
pub fn next_waypoint(now: f64) -> Result<bool, JsValue> {
    with_host(|host| host.showcase.next(Time(now)))
}

#[wasm_bindgen]
pub fn previous_waypoint(now: f64) -> Result<bool, JsValue> {
    with_host(|host| host.showcase.previous(Time(now)))
}

#[wasm_bindgen]
pub fn map_loaded(now: f64) -> Result<(), JsValue> {
    with_host(|host| host.showcase.on_map_loaded(Time(now)))
}

#[wasm_bindgen]
pub fn map_error(message: &str, now: f64) -> Result<(), JsValue> {
    with_host(|host| host.showcase.on_map_error(message, Time(now)))
}

/// Forward the map's move, zoom, rotate and pitch events here.
#[wasm_bindgen]
pub fn map_moved() -> Result<(), JsValue> {
    with_host(|host| host.showcase.on_map_moved())
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64, now: f64) -> Result<(), JsValue> {
    with_host(|host| {
        host.showcase
            .on_resize(Resolution::new(width, height), Time(now))
    })
}

#[wasm_bindgen]
pub fn set_pixel_ratio(ratio: f64) -> Result<(), JsValue> {
    with_host(|host| host.showcase.set_pixel_ratio(ratio, &mut host.sink))
}

#[wasm_bindgen]
pub fn set_auto_thresholds(enabled: bool) -> Result<(), JsValue> {
    with_host(|host| host.showcase.set_auto_thresholds(enabled, &mut host.sink))
}

/// Reports an `<img>` load or error for a ticket from a load command.
#[wasm_bindgen]
pub fn image_loaded(ticket: f64, error: Option<String>) -> Result<bool, JsValue> {
    let outcome = match error {
        Some(reason) => LoadOutcome::failed(reason),
        None => LoadOutcome::Loaded,
    };
    with_host(|host| host.showcase.on_image_load(LoadTicket(ticket as u64), outcome))
}

#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn expand_image(
    position: u32,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    viewport_width: f64,
    viewport_height: f64,
    slow: bool,
) -> Result<bool, JsValue> {
    let rect = Rect::new(x, y, width, height);
    let viewport = Rect::new(0.0, 0.0, viewport_width, viewport_height);
    with_host(|host| {
        host.showcase
            .expand_image(position as usize, rect, viewport, slow)
    })
}

#[wasm_bindgen]
pub fn collapse_image(now: f64) -> Result<(), JsValue> {
    with_host(|host| host.showcase.collapse_image(Time(now)))
}

#[wasm_bindgen]
pub fn card_transition_finished(now: f64) -> Result<(), JsValue> {
    with_host(|host| host.showcase.on_card_transition_finished(Time(now)))
}

/// Opens or closes the welcome card from the logo button at `x, y, w, h`.
#[wasm_bindgen]
pub fn toggle_welcome(x: f64, y: f64, width: f64, height: f64, now: f64) -> Result<bool, JsValue> {
    with_host(|host| {
        let origin = Rect::new(x, y, width, height);
        host.showcase
            .toggle_welcome(origin, Time(now), host.store.as_mut())
    })
}

/// Returns the new style (`{url, name, hideAllLabels}`) or `undefined`.
#[wasm_bindgen]
pub fn cycle_map_style() -> Result<JsValue, JsValue> {
    let style = with_host(|host| host.showcase.cycle_map_style(host.store.as_mut()))?;
    match style {
        Some(style) => to_js(&style),
        None => Ok(JsValue::UNDEFINED),
    }
}
