//! DOM event wiring
//!
//! Pointer input is observed on the document without ever calling
//! `preventDefault`, so links, buttons and scrolling behave as if the painter
//! were not there. Lock state changes are announced to the page as
//! `pigment:lock` CustomEvents whose detail is `"locked"` or `"unlocked"`.

use std::cell::RefCell;
use std::rc::Rc;

use painting::{AmbientRenderer, LockState};
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Event, EventTarget, KeyboardEvent, PointerEvent, Window,
};

use crate::canvas::CanvasSurface;
use crate::dom;
use crate::error::HostError;

pub type SharedRenderer = Rc<RefCell<AmbientRenderer<CanvasSurface>>>;

/// Event dispatched on `window` when painting locks or unlocks
pub const LOCK_EVENT: &str = "pigment:lock";

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Register every listener the painter needs
pub fn attach_listeners(
    window: &Window,
    document: &Document,
    renderer: &SharedRenderer,
) -> Result<(), HostError> {
    {
        let renderer = renderer.clone();
        listen(document, "pointerdown", move |event| {
            let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let target = dom::target_path(&event);
            renderer.borrow_mut().pointer_down(
                dom::pointer_sample(pointer),
                dom::pointer_kind(pointer),
                &target,
            );
        })?;
    }

    {
        let renderer = renderer.clone();
        listen(document, "pointermove", move |event| {
            if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
                renderer.borrow_mut().pointer_move(dom::pointer_sample(pointer));
            }
        })?;
    }

    {
        let renderer = renderer.clone();
        listen(document, "pointerup", move |event| {
            renderer.borrow_mut().pointer_up(event.time_stamp());
        })?;
    }

    {
        let renderer = renderer.clone();
        listen(document, "pointercancel", move |event| {
            renderer.borrow_mut().pointer_cancel(event.time_stamp());
        })?;
    }

    {
        let renderer = renderer.clone();
        let win = window.clone();
        listen(window, "resize", move |_| {
            renderer.borrow_mut().resize(dom::viewport(&win));
        })?;
    }

    {
        let renderer = renderer.clone();
        listen(window, "blur", move |_| {
            renderer.borrow_mut().interrupt();
        })?;
    }

    {
        let renderer = renderer.clone();
        let win = window.clone();
        listen(document, "keydown", move |event| {
            let is_escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| key.key() == "Escape");
            if !is_escape {
                return;
            }
            let change = renderer.borrow_mut().relock();
            if let Some(state) = change {
                notify_lock(&win, state);
            }
        })?;
    }

    Ok(())
}

/// Drive `render_frame` from `requestAnimationFrame` for the page's lifetime
pub fn start_frame_loop(window: &Window, renderer: &SharedRenderer) -> Result<(), HostError> {
    let frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let renderer = renderer.clone();
    let win = window.clone();

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        let report = renderer.borrow_mut().render_frame(timestamp);
        if let Some(state) = report.lock_change {
            notify_lock(&win, state);
        }

        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = request_frame(&win, callback) {
                web_sys::console::error_1(&format!("pigment: frame loop stopped: {}", err).into());
            }
        }
    }) as Box<dyn FnMut(f64)>));

    match frame.borrow().as_ref() {
        Some(callback) => request_frame(window, callback),
        None => Ok(()),
    }
}

/// Tell the page the lock state changed
pub fn notify_lock(window: &Window, state: LockState) {
    let json = match serde_json::to_string(&state) {
        Ok(json) => json,
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to serialize lock state: {}", e).into());
            return;
        }
    };
    // Detail is the bare state name, not a JSON string literal
    let detail = json.trim_matches('"');

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&JsValue::from_str(detail));
    let dispatched = web_sys::CustomEvent::new_with_event_init_dict(LOCK_EVENT, &init)
        .and_then(|event| window.dispatch_event(&event));
    if let Err(err) = dispatched {
        web_sys::console::error_2(&"pigment: lock event failed".into(), &err);
    }
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Result<(), HostError> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map(|_| ())
        .map_err(HostError::dom)
}

/// Passive listener that lives as long as the page
fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), HostError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);

    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(HostError::dom)?;

    // Keep the closure alive
    closure.forget();
    Ok(())
}
