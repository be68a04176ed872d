//! Thin helpers over web-sys: lookups, timers, listeners and frame loops.
//!
//! Every fallible DOM call is mapped to a [`BackdropError`] so effect
//! installers can use `?` and let start-up sequencing decide what to do.

use backdrop_core::error::BackdropError;
use backdrop_core::prng::RandomSource;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, HtmlElement, Window};

/// The message carried by a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Wraps a thrown JS value as [`BackdropError::Dom`].
pub fn js_error(value: JsValue) -> BackdropError {
    BackdropError::Dom(js_message(&value))
}

/// # Errors
///
/// [`BackdropError::MissingElement`] outside a browsing context.
pub fn window() -> Result<Window, BackdropError> {
    web_sys::window().ok_or_else(|| BackdropError::MissingElement("window".into()))
}

pub fn document() -> Result<Document, BackdropError> {
    window()?
        .document()
        .ok_or_else(|| BackdropError::MissingElement("document".into()))
}

pub fn body() -> Result<HtmlElement, BackdropError> {
    document()?
        .body()
        .ok_or_else(|| BackdropError::MissingElement("body".into()))
}

/// Milliseconds from `performance.now()`, the clock shared by frames,
/// tweens and throttles.
pub fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

/// Viewport size in CSS pixels.
pub fn viewport(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// All elements matching `selector`, in document order.
pub fn query_all(selector: &str) -> Result<Vec<HtmlElement>, BackdropError> {
    let list = document()?.query_selector_all(selector).map_err(js_error)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

/// First match for `selector`, if any. Invalid selectors count as no match.
pub fn query(selector: &str) -> Option<HtmlElement> {
    document()
        .ok()?
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::debug!("could not set {property}: {}", js_error(e));
    }
}

/// Runs `f` once after `delay_ms`.
pub fn set_timeout(delay_ms: f64, f: impl FnOnce() + 'static) -> Result<i32, BackdropError> {
    let callback = Closure::once_into_js(f);
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms.max(0.0).round() as i32,
        )
        .map_err(js_error)
}

/// Like [`set_timeout`] but logs scheduling failures; for use inside
/// callbacks that have nowhere to return an error.
pub fn defer(delay_ms: f64, f: impl FnOnce() + 'static) {
    if let Err(e) = set_timeout(delay_ms, f) {
        log::warn!("timer not scheduled: {e}");
    }
}

/// Adds a listener that lives for the rest of the page.
pub fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static) -> Result<(), BackdropError>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

/// Calls `frame` on every animation frame with the frame timestamp until it
/// returns false.
pub fn animation_loop(mut frame: impl FnMut(f64) -> bool + 'static) -> Result<(), BackdropError> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();

    *slot.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        if !frame(timestamp) {
            release(&next);
            return;
        }
        let scheduled = next
            .borrow()
            .as_ref()
            .ok_or_else(|| BackdropError::Dom("frame callback missing".into()))
            .and_then(request_frame);
        if let Err(e) = scheduled {
            log::error!("animation loop ended: {e}");
            release(&next);
        }
    }));

    let started = slot
        .borrow()
        .as_ref()
        .ok_or_else(|| BackdropError::Dom("frame callback missing".into()))
        .and_then(request_frame);
    if started.is_err() {
        slot.borrow_mut().take();
    }
    started
}

/// Drops a finished loop's closure, and with it everything the frame
/// callback captured. The closure is still on the stack when the loop ends,
/// so the drop waits for the next task.
fn release(slot: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
    let slot = Rc::clone(slot);
    defer(0.0, move || {
        slot.borrow_mut().take();
    });
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<(), BackdropError> {
    window()?
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map(|_| ())
        .map_err(js_error)
}

/// `Math.random()` as a [`RandomSource`], for effects that draw a handful of
/// numbers.
pub struct JsRandom;

impl RandomSource for JsRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}
