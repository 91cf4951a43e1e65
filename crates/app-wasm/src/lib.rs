//! Pigment browser host
//!
//! Installs the ambient painter into a page: a background canvas, document
//! pointer listeners and a `requestAnimationFrame` loop. Pages that use the
//! long-press lock listen for `pigment:lock` events to show their own hint.

use std::cell::RefCell;
use std::rc::Rc;

use painting::AmbientRenderer;
use pigment_config::PainterConfig;
use wasm_bindgen::prelude::*;

mod bridge;
mod canvas;
mod dom;
mod error;

pub use bridge::LOCK_EVENT;
pub use canvas::{CanvasSurface, css_rgba};
pub use error::HostError;

/// Handle returned to JavaScript for explicit lock control
#[wasm_bindgen]
pub struct PainterHandle {
    window: web_sys::Window,
    renderer: bridge::SharedRenderer,
}

#[wasm_bindgen]
impl PainterHandle {
    /// Allow painting now. Returns true if the state changed.
    pub fn unlock(&self) -> bool {
        let change = self.renderer.borrow_mut().unlock(dom::now_ms(&self.window));
        self.announce(change)
    }

    /// Stop painting now. Returns true if the state changed.
    pub fn relock(&self) -> bool {
        let change = self.renderer.borrow_mut().relock();
        self.announce(change)
    }

    #[wasm_bindgen(getter)]
    pub fn unlocked(&self) -> bool {
        self.renderer.borrow().is_unlocked()
    }

    #[wasm_bindgen(getter, js_name = markCount)]
    pub fn mark_count(&self) -> usize {
        self.renderer.borrow().mark_count()
    }

    /// Drop every visible mark
    pub fn clear(&self) {
        self.renderer.borrow_mut().clear_marks();
    }

    fn announce(&self, change: Option<painting::LockState>) -> bool {
        match change {
            Some(state) => {
                bridge::notify_lock(&self.window, state);
                true
            }
            None => false,
        }
    }
}

/// Install the painter into the current page.
///
/// `config_json` is an optional `PainterConfig` JSON document; omitted fields
/// keep their defaults.
#[wasm_bindgen(js_name = installPainter)]
pub fn install_painter(config_json: Option<String>) -> Result<PainterHandle, JsValue> {
    // Set up panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    install(config_json.as_deref()).map_err(JsValue::from)
}

fn install(config_json: Option<&str>) -> Result<PainterHandle, HostError> {
    let config = match config_json {
        Some(json) => PainterConfig::from_json(json)?,
        None => PainterConfig::default(),
    };

    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let document = window.document().ok_or(HostError::NoDocument)?;

    let surface = CanvasSurface::install(&document)?;
    let mut renderer = AmbientRenderer::from_config(surface, config)?;
    renderer.resize(dom::viewport(&window));
    let locked = !renderer.is_unlocked();

    let renderer = Rc::new(RefCell::new(renderer));
    bridge::attach_listeners(&window, &document, &renderer)?;
    bridge::start_frame_loop(&window, &renderer)?;

    web_sys::console::log_1(
        &format!(
            "Pigment painter installed ({})",
            if locked { "locked" } else { "unlocked" }
        )
        .into(),
    );

    Ok(PainterHandle { window, renderer })
}
