#![cfg(target_arch = "wasm32")]
//! Browser entry point for the galaxy backdrop.
//!
//! `start` runs when the module is instantiated: it installs logging, waits
//! for the DOM, detects the capability from the viewport width and installs
//! every page effect through `backdrop_core::bootstrap`. `teardown` stops
//! the background and releases its GL resources.

mod background;
mod dom;
mod page;

use backdrop_core::bootstrap::{initialize, Effect, EffectHost, FALLBACK_CLASS};
use backdrop_core::{BackdropError, Capability};
use wasm_bindgen::prelude::*;
use web_sys::Event;

/// Installs effects into the live document.
struct PageHost;

impl EffectHost for PageHost {
    fn install(&mut self, effect: Effect, capability: Capability) -> Result<(), BackdropError> {
        match effect {
            Effect::LoadingScreen => page::install_loading_screen(),
            Effect::Navigation => page::install_navigation(),
            Effect::ScrollReveal => page::install_scroll_reveal(),
            Effect::ClickBurst => page::install_click_burst(),
            Effect::Typing => page::install_typing(),
            Effect::Counters => page::install_counters(),
            Effect::Background => background::install(capability),
            Effect::ErrorFallback => page::install_error_fallback(),
            Effect::FrameRateMonitor => page::install_frame_rate_monitor(),
        }
    }
}

fn boot() {
    let width = dom::window().map(|w| dom::viewport(&w).0).unwrap_or(0.0);
    let capability = Capability::detect(width);
    let report = initialize(&mut PageHost, capability);
    if report.needs_fallback() {
        match dom::body() {
            Ok(body) => {
                if let Err(e) = body.class_list().add_1(FALLBACK_CLASS) {
                    log::error!("could not add {FALLBACK_CLASS}: {}", dom::js_error(e));
                }
            }
            Err(e) => log::error!("could not add {FALLBACK_CLASS}: {e}"),
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let document = dom::document().map_err(|e| JsValue::from_str(&e.to_string()))?;
    if document.ready_state() == "loading" {
        dom::listen(&document, "DOMContentLoaded", |_: Event| boot())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
    } else {
        boot();
    }
    Ok(())
}

/// Stops the background animation and frees its GPU resources.
#[wasm_bindgen]
pub fn teardown() {
    background::teardown();
}
