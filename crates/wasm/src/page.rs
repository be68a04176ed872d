//! DOM wiring for the page effects. Each `install_*` function registers its
//! listeners and returns; the effect state machines live in
//! `backdrop_core::effects`.

use crate::background;
use crate::dom::{self, JsRandom};
use backdrop_core::bootstrap::{is_webgl_failure, BACKGROUND_ID};
use backdrop_core::effects::burst::BURST_PARTICLE_COUNT;
use backdrop_core::effects::counter::{COUNTER_ATTRIBUTE, COUNTER_SELECTOR};
use backdrop_core::effects::loading::{
    entrance_delay_ms, LoadingPhase, ENTRANCE_ANIMATION, ENTRANCE_GROUPS, LOADER_FADE_CLASS, LOADER_ID,
};
use backdrop_core::effects::navigation::{
    active_section, anchor_scroll_top, is_active_link, ACTIVE_LINK_CLASS, ANCHOR_PULSE_MS, ANCHOR_PULSE_RESET,
    ANCHOR_PULSE_TRANSFORM, ANCHOR_SELECTOR, HEADER_SELECTOR, NAV_LINK_SELECTOR, SCROLL_THROTTLE_MS,
    SECTION_SELECTOR,
};
use backdrop_core::effects::reveal::{REVEAL_ROOT_MARGIN, REVEAL_SELECTOR, REVEAL_THRESHOLD};
use backdrop_core::effects::typing::{CARET_REMOVED, TYPING_SELECTOR};
use backdrop_core::effects::{
    ClickBurst, CounterAnimation, FpsMonitor, HeaderVisibility, LoadingSequence, RevealKind, RevealTracker,
    SectionBounds, Typewriter, TypingStep,
};
use backdrop_core::{throttle, BackdropError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    ErrorEvent, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, ScrollBehavior, ScrollToOptions,
};

const REVEAL_KEY_ATTRIBUTE: &str = "data-reveal-key";

/* ---------- loading screen ---------- */

fn run_entrances() {
    for (group, selector) in ENTRANCE_GROUPS.iter().enumerate() {
        let elements = match dom::query_all(selector) {
            Ok(elements) => elements,
            Err(e) => {
                log::warn!("entrance group {selector} skipped: {e}");
                continue;
            }
        };
        for (index, el) in elements.into_iter().enumerate() {
            dom::defer(entrance_delay_ms(group, index), move || {
                dom::set_style(&el, "opacity", "1");
                if el.style().get_property_value("animation").unwrap_or_default().is_empty() {
                    dom::set_style(&el, "animation", ENTRANCE_ANIMATION);
                }
            });
        }
    }
}

fn step_loader(mut sequence: LoadingSequence) {
    let Some(delay) = sequence.next_delay_ms() else {
        return;
    };
    dom::defer(delay, move || {
        let loader = dom::document().ok().and_then(|d| d.get_element_by_id(LOADER_ID));
        match sequence.advance() {
            LoadingPhase::FadingOut => {
                if let Some(loader) = &loader {
                    let _ = loader.class_list().add_1(LOADER_FADE_CLASS);
                }
                step_loader(sequence);
            }
            LoadingPhase::Done => {
                if let Some(loader) = loader.and_then(|l| l.dyn_into::<HtmlElement>().ok()) {
                    dom::set_style(&loader, "display", "none");
                }
                run_entrances();
            }
            LoadingPhase::Holding => {}
        }
    });
}

/// Fades the loader out once the window has loaded, then runs the
/// entrance animations. A page without a loader still gets its entrances.
pub fn install_loading_screen() -> Result<(), BackdropError> {
    let document = dom::document()?;
    if document.get_element_by_id(LOADER_ID).is_none() {
        log::debug!("no #{LOADER_ID} element, entrances run after load");
    }
    if document.ready_state() == "complete" {
        step_loader(LoadingSequence::new());
        return Ok(());
    }
    dom::listen(&dom::window()?, "load", |_: Event| step_loader(LoadingSequence::new()))
}

/* ---------- navigation ---------- */

/// Header hide-on-scroll, smooth anchor scrolling and active link
/// highlighting.
pub fn install_navigation() -> Result<(), BackdropError> {
    let window = dom::window()?;

    if let Some(header) = dom::query(HEADER_SELECTOR) {
        let mut visibility = HeaderVisibility::new();
        let mut on_scroll = throttle(SCROLL_THROTTLE_MS, move |scroll_top: f64| {
            dom::set_style(&header, "transform", visibility.on_scroll(scroll_top).transform());
        });
        dom::listen(&window, "scroll", move |_: Event| {
            let scroll_top = dom::window().ok().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0);
            on_scroll(dom::now(), scroll_top);
        })?;
    }

    for anchor in dom::query_all(ANCHOR_SELECTOR)? {
        let link = anchor.clone();
        dom::listen(&anchor, "click", move |e: MouseEvent| {
            e.prevent_default();
            let Some(href) = link.get_attribute("href") else { return };
            let Some(target) = dom::query(&href) else { return };
            let options = ScrollToOptions::new();
            options.set_top(anchor_scroll_top(f64::from(target.offset_top())));
            options.set_behavior(ScrollBehavior::Smooth);
            if let Ok(window) = dom::window() {
                window.scroll_to_with_scroll_to_options(&options);
            }
            dom::set_style(&link, "transform", ANCHOR_PULSE_TRANSFORM);
            let link = link.clone();
            dom::defer(ANCHOR_PULSE_MS, move || dom::set_style(&link, "transform", ANCHOR_PULSE_RESET));
        })?;
    }

    let sections = dom::query_all(SECTION_SELECTOR)?;
    let nav_links = dom::query_all(NAV_LINK_SELECTOR)?;
    let mut on_scroll = throttle(SCROLL_THROTTLE_MS, move |scroll_y: f64| {
        let bounds: Vec<SectionBounds> = sections
            .iter()
            .map(|s| SectionBounds {
                id: s.id(),
                top: f64::from(s.offset_top()),
                height: f64::from(s.client_height()),
            })
            .collect();
        let current = active_section(&bounds, scroll_y);
        for link in &nav_links {
            let classes = link.class_list();
            let _ = classes.remove_1(ACTIVE_LINK_CLASS);
            if is_active_link(&link.get_attribute("href").unwrap_or_default(), current) {
                let _ = classes.add_1(ACTIVE_LINK_CLASS);
            }
        }
    });
    dom::listen(&window, "scroll", move |_: Event| {
        let scroll_y = dom::window().ok().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0);
        on_scroll(dom::now(), scroll_y);
    })
}

/* ---------- scroll reveal ---------- */

/// Observes every reveal target until it first scrolls into view.
///
/// # Errors
///
/// Fails when `IntersectionObserver` cannot be constructed.
pub fn install_scroll_reveal() -> Result<(), BackdropError> {
    let tracker: Rc<RefCell<RevealTracker<String>>> = Rc::new(RefCell::new(RevealTracker::new()));
    let callback = {
        let tracker = tracker.clone();
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                    let target = entry.target();
                    let Some(key) = target.get_attribute(REVEAL_KEY_ATTRIBUTE) else { continue };
                    let classes = target.class_list();
                    let names: Vec<String> = (0..classes.length()).filter_map(|i| classes.item(i)).collect();
                    let kind = RevealKind::from_classes(names.iter().map(String::as_str));
                    let action = tracker
                        .borrow_mut()
                        .on_visibility(&key, entry.is_intersecting(), kind, &mut JsRandom);
                    let Some(action) = action else { continue };
                    observer.unobserve(&target);
                    let Ok(el) = target.dyn_into::<HtmlElement>() else { continue };
                    dom::defer(action.delay_ms, move || {
                        dom::set_style(&el, "animation-delay", "0s");
                        let _ = el.class_list().add_1(action.class);
                        if let Some(animation) = action.animation {
                            dom::set_style(&el, "animation", animation);
                        }
                    });
                }
            },
        )
    };

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    options.set_root_margin(REVEAL_ROOT_MARGIN);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        .map_err(dom::js_error)?;
    callback.forget();

    for (index, el) in dom::query_all(REVEAL_SELECTOR)?.iter().enumerate() {
        let key = index.to_string();
        el.set_attribute(REVEAL_KEY_ATTRIBUTE, &key).map_err(dom::js_error)?;
        if tracker.borrow_mut().observe(key) {
            observer.observe(el);
        }
    }
    Ok(())
}

/* ---------- click bursts ---------- */

fn spawn_burst(x: f64, y: f64) -> Result<(), BackdropError> {
    let document = dom::document()?;
    let body = dom::body()?;
    let mut burst = ClickBurst::new(x, y);
    let mut dots = Vec::with_capacity(BURST_PARTICLE_COUNT);
    for particle in burst.particles() {
        let dot = document
            .create_element("div")
            .map_err(dom::js_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| BackdropError::Dom("created element is not an HtmlElement".into()))?;
        dot.style().set_css_text(&particle.css_text());
        body.append_child(&dot).map_err(dom::js_error)?;
        dots.push(dot);
    }
    dom::animation_loop(move |_| {
        let alive = burst.step();
        for (dot, particle) in dots.iter().zip(burst.particles()) {
            if particle.is_alive() {
                dom::set_style(dot, "left", &format!("{}px", particle.x));
                dom::set_style(dot, "top", &format!("{}px", particle.y));
                dom::set_style(dot, "opacity", &particle.opacity().to_string());
            } else {
                dot.remove();
            }
        }
        alive
    })
}

pub fn install_click_burst() -> Result<(), BackdropError> {
    dom::listen(&dom::document()?, "click", |e: MouseEvent| {
        if let Err(err) = spawn_burst(f64::from(e.client_x()), f64::from(e.client_y())) {
            log::warn!("click burst failed: {err}");
        }
    })
}

/* ---------- typing ---------- */

fn type_next(el: HtmlElement, mut writer: Typewriter) {
    match writer.step() {
        TypingStep::Typed { text, next_in_ms } => {
            el.set_text_content(Some(&text));
            dom::defer(next_in_ms, move || type_next(el, writer));
        }
        TypingStep::Finished { caret_in_ms } => {
            el.set_text_content(Some(&writer.visible_text()));
            dom::defer(caret_in_ms, move || dom::set_style(&el, "border-right", CARET_REMOVED));
        }
    }
}

pub fn install_typing() -> Result<(), BackdropError> {
    for (index, el) in dom::query_all(TYPING_SELECTOR)?.into_iter().enumerate() {
        let writer = Typewriter::new(&el.text_content().unwrap_or_default(), index);
        el.set_text_content(Some(""));
        dom::set_timeout(writer.first_step_in_ms(), move || type_next(el, writer))?;
    }
    Ok(())
}

/* ---------- counters ---------- */

fn count_up(el: HtmlElement) {
    let value = el.get_attribute(COUNTER_ATTRIBUTE).unwrap_or_default();
    let mut counter = match CounterAnimation::from_attribute(&value) {
        Ok(counter) => counter,
        Err(e) => {
            log::warn!("counter skipped: {e}");
            return;
        }
    };
    let started = dom::animation_loop(move |_| {
        el.set_text_content(Some(&counter.tick().to_string()));
        !counter.is_finished()
    });
    if let Err(e) = started {
        log::warn!("counter not started: {e}");
    }
}

/// Starts each `[data-count]` counter the first time it becomes visible.
pub fn install_counters() -> Result<(), BackdropError> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);
                if let Ok(el) = target.dyn_into::<HtmlElement>() {
                    count_up(el);
                }
            }
        },
    );
    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref()).map_err(dom::js_error)?;
    callback.forget();
    for el in dom::query_all(COUNTER_SELECTOR)? {
        observer.observe(&el);
    }
    Ok(())
}

/* ---------- error fallback ---------- */

/// Hides the background canvas when an uncaught error mentions WebGL.
pub fn install_error_fallback() -> Result<(), BackdropError> {
    dom::listen(&dom::window()?, "error", |e: ErrorEvent| {
        let message = e.message();
        log::warn!("uncaught error: {message}");
        if is_webgl_failure(&message) {
            if let Some(canvas) = dom::query(&format!("#{BACKGROUND_ID}")) {
                dom::set_style(&canvas, "display", "none");
            }
            background::teardown();
        }
    })
}

/* ---------- frame rate monitor ---------- */

pub fn install_frame_rate_monitor() -> Result<(), BackdropError> {
    let mut monitor = FpsMonitor::new(dom::now());
    dom::animation_loop(move |_| {
        monitor.frame(dom::now(), background::particle_count());
        true
    })
}
