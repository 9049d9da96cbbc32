//! Adapters between the page and the showcase seams.

use foundation::math::{LonLat, Vec2};
use gallery::{LayoutTarget, SlotId};
use js_sys::{Array, Function};
use viewport::{AppliedStyle, DeviceClass, StyleSink};
use wasm_bindgen::{JsCast, JsValue};

const MOBILE_CLASS: &str = "mobile-device";

/// Calls `project(lon, lat)` supplied by the map SDK glue; expects `[x, y]`.
pub fn project_with(project: &Function, at: LonLat) -> Vec2 {
    let value = match project.call2(&JsValue::NULL, &at.lon.into(), &at.lat.into()) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(?err, "project callback failed");
            return Vec2::default();
        }
    };
    if !Array::is_array(&value) {
        return Vec2::default();
    }
    let point = Array::from(&value);
    Vec2::new(
        point.get(0).as_f64().unwrap_or(0.0),
        point.get(1).as_f64().unwrap_or(0.0),
    )
}

/// Calls `measure(position, part)` where `part` is `"primary"`, `"secondary"`
/// or `"full"`. Anything but a number reads as not laid out.
pub fn measure_with(measure: &Function, target: LayoutTarget) -> f64 {
    let (position, part) = match target {
        LayoutTarget::Slot { position, slot } => (
            position,
            match slot {
                SlotId::Primary => "primary",
                SlotId::Secondary => "secondary",
            },
        ),
        LayoutTarget::Full { position } => (position, "full"),
    };
    measure
        .call2(&JsValue::NULL, &(position as u32).into(), &part.into())
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Writes the scale to the document root and body.
#[derive(Debug, Default)]
pub struct DomStyleSink;

impl StyleSink for DomStyleSink {
    fn apply(&mut self, style: &AppliedStyle) {
        if let Err(err) = apply_to_document(style) {
            tracing::warn!(?err, "could not apply viewport style");
        }
    }
}

fn apply_to_document(style: &AppliedStyle) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if let Some(root) = document.document_element() {
        let root: web_sys::HtmlElement = root.dyn_into()?;
        for (name, value) in style.css_variables() {
            root.style().set_property(name, &value)?;
        }
    }

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    let css = body.style();
    for (name, value) in style.body_declarations() {
        if value.is_empty() {
            css.remove_property(name)?;
        } else {
            css.set_property(name, &value)?;
        }
    }
    body.class_list()
        .toggle_with_force(MOBILE_CLASS, style.device == DeviceClass::Mobile)?;
    Ok(())
}
