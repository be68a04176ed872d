//! The galaxy background: WebGL2 context, frame loop and input handlers.

use crate::dom;
use backdrop_core::animation::POINTER_THROTTLE_MS;
use backdrop_core::bootstrap::BACKGROUND_ID;
use backdrop_core::render::{GpuContext, PointRenderer};
use backdrop_core::scene::build_scene;
use backdrop_core::{BackdropError, Capability, FrameLoop, LoopState, Throttled, Xorshift64};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, MouseEvent, WebGl2RenderingContext, WebGlContextAttributes};

type BackgroundLoop = Rc<RefCell<FrameLoop<PointRenderer>>>;

thread_local! {
    static RUNNING: RefCell<Option<BackgroundLoop>> = const { RefCell::new(None) };
}

/// Particles in the running field, or 0 when the background is off.
pub fn particle_count() -> usize {
    RUNNING.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|l| l.try_borrow().ok().map(|l| l.context().config.field.count))
            .unwrap_or(0)
    })
}

/// Stops the loop, releases GL resources and clears the scene. Safe to call
/// more than once.
pub fn teardown() {
    if let Some(frame_loop) = RUNNING.with(|slot| slot.borrow_mut().take()) {
        match frame_loop.try_borrow_mut() {
            Ok(mut l) => l.teardown(),
            Err(_) => log::warn!("background busy, teardown skipped"),
        }
    }
}

fn size_canvas(canvas: &HtmlCanvasElement, css_width: f64, css_height: f64, ratio: f64) -> (u32, u32) {
    let width = (css_width * ratio).round() as u32;
    let height = (css_height * ratio).round() as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    dom::set_style(canvas, "width", &format!("{css_width}px"));
    dom::set_style(canvas, "height", &format!("{css_height}px"));
    (width, height)
}

fn webgl2_context(canvas: &HtmlCanvasElement, antialias: bool) -> Result<glow::Context, BackdropError> {
    let attributes = WebGlContextAttributes::new();
    attributes.set_alpha(true);
    attributes.set_antialias(antialias);
    let context = canvas
        .get_context_with_context_options("webgl2", &attributes)
        .map_err(|e| BackdropError::RendererUnavailable(dom::js_message(&e)))?
        .ok_or_else(|| BackdropError::RendererUnavailable("WebGL2 is not supported".into()))?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| BackdropError::RendererUnavailable("unexpected webgl2 context type".into()))?;
    Ok(glow::Context::from_webgl2_context(context))
}

fn wire_inputs(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
    frame_loop: &BackgroundLoop,
    pointer_parallax: bool,
) -> Result<(), BackdropError> {
    {
        let frame_loop = frame_loop.clone();
        let canvas = canvas.clone();
        dom::listen(window, "resize", move |_: Event| {
            let Ok(window) = dom::window() else { return };
            let (w, h) = dom::viewport(&window);
            let dpr = window.device_pixel_ratio();
            if let Ok(mut l) = frame_loop.try_borrow_mut() {
                size_canvas(&canvas, w, h, l.context().config.pixel_ratio(dpr));
                l.resize(w, h, dpr);
            }
        })?;
    }

    if pointer_parallax {
        let frame_loop = frame_loop.clone();
        let mut aim = Throttled::new(POINTER_THROTTLE_MS, move |e: MouseEvent| {
            let Ok(window) = dom::window() else { return };
            let (w, h) = dom::viewport(&window);
            if let Ok(mut l) = frame_loop.try_borrow_mut() {
                l.pointer_moved(f64::from(e.client_x()), f64::from(e.client_y()), w, h, dom::now());
            }
        });
        dom::listen(&dom::document()?, "mousemove", move |e: MouseEvent| {
            aim.call(dom::now(), e);
        })?;
    }

    dom::listen(window, "beforeunload", |_: Event| teardown())
}

/// Builds the scene, wires resize, pointer and unload handlers, then starts
/// the frame loop.
///
/// # Errors
///
/// Missing canvas, WebGL2 or shader support is
/// [`BackdropError::RendererUnavailable`]. If any later step fails the
/// renderer is disposed before returning, so nothing keeps drawing.
pub fn install(capability: Capability) -> Result<(), BackdropError> {
    let window = dom::window()?;
    let canvas = dom::document()?
        .get_element_by_id(BACKGROUND_ID)
        .ok_or_else(|| BackdropError::RendererUnavailable(format!("no #{BACKGROUND_ID} canvas")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| BackdropError::RendererUnavailable(format!("#{BACKGROUND_ID} is not a canvas")))?;

    let (css_width, css_height) = dom::viewport(&window);
    let mut rng = Xorshift64::from_entropy(&[js_sys::Math::random(), js_sys::Math::random(), dom::now()]);
    let context = build_scene(css_width, css_height, capability, &mut rng);
    let config = &context.config;

    let dpr = window.device_pixel_ratio();
    let (width, height) = size_canvas(&canvas, css_width, css_height, config.pixel_ratio(dpr));
    let gpu = GpuContext::new(webgl2_context(&canvas, config.antialias)?)?;
    let pointer_parallax = config.pointer_parallax;

    let renderer = PointRenderer::new(gpu, &context.scene, width, height)?;
    let frame_loop: BackgroundLoop = Rc::new(RefCell::new(FrameLoop::new(context, renderer)));

    if let Err(e) = wire_inputs(&window, &canvas, &frame_loop, pointer_parallax) {
        frame_loop.borrow_mut().teardown();
        return Err(e);
    }

    RUNNING.with(|slot| *slot.borrow_mut() = Some(frame_loop.clone()));
    let ticking = dom::animation_loop(move |now| match frame_loop.try_borrow_mut() {
        Ok(mut l) => l.tick(now) == LoopState::Running,
        Err(_) => true,
    });
    if ticking.is_err() {
        teardown();
    }
    ticking
}
