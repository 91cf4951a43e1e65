//! DOM helpers: viewport size and the element chain under a pointer

use painting::{ElementInfo, MAX_TARGET_DEPTH, PointerKind, PointerSample, TargetPath};
use pigment_config::DisplayConfig;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, PointerEvent, Window};

/// Current CSS viewport size and device pixel ratio
pub fn viewport(window: &Window) -> DisplayConfig {
    DisplayConfig::new(
        css_dimension(window.inner_width()),
        css_dimension(window.inner_height()),
    )
    .with_scale(window.device_pixel_ratio() as f32)
}

fn css_dimension(value: Result<JsValue, JsValue>) -> u32 {
    value
        .ok()
        .and_then(|v| v.as_f64())
        .map_or(0, |v| v.max(0.0) as u32)
}

/// Milliseconds on the same clock as event and animation frame timestamps
pub fn now_ms(window: &Window) -> f64 {
    window.performance().map_or(0.0, |p| p.now())
}

/// Pointer position, pressure and timestamp in viewport CSS pixels
pub fn pointer_sample(event: &PointerEvent) -> PointerSample {
    PointerSample::new(
        event.client_x() as f32,
        event.client_y() as f32,
        event.pressure(),
        event.time_stamp(),
    )
}

pub fn pointer_kind(event: &PointerEvent) -> PointerKind {
    PointerKind::from_dom(&event.pointer_type())
}

/// The event target followed by its ancestors, nearest first
pub fn target_path(event: &Event) -> TargetPath {
    let mut path = TargetPath::empty();
    let mut current = event.target().and_then(|t| t.dyn_into::<Element>().ok());

    while let Some(element) = current {
        if path.elements().len() >= MAX_TARGET_DEPTH {
            break;
        }
        path.push_ancestor(element_info(&element));
        current = element.parent_element();
    }
    path
}

fn element_info(element: &Element) -> ElementInfo {
    let names: js_sys::Array = element.get_attribute_names();
    let attributes: Vec<(String, String)> = names
        .iter()
        .filter_map(|name| name.as_string())
        .map(|name| {
            let value = element.get_attribute(&name).unwrap_or_default();
            (name, value)
        })
        .collect();
    describe_element(&element.tag_name(), &attributes)
}

/// Exclusion view of an element from its tag and raw attributes.
///
/// `id` and `class` come from the attribute list rather than the `id` and
/// `className` properties: on SVG elements `className` is an
/// `SVGAnimatedString`, not the class list.
fn describe_element(tag: &str, attributes: &[(String, String)]) -> ElementInfo {
    let mut info = ElementInfo::new(tag);
    for (name, value) in attributes {
        match name.to_ascii_lowercase().as_str() {
            "class" => info = info.with_class_list(value),
            "id" if !value.is_empty() => info = info.with_id(value.as_str()),
            "id" => {}
            _ => info = info.with_attribute(name.as_str(), value.as_str()),
        }
    }
    info
}
