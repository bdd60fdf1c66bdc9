use crate::dom;
use crate::viewer::{self, SharedViewer};
use pano_render::Renderer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Owner of a running requestAnimationFrame loop.
pub struct LoopHandle {
    alive: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
}

impl LoopHandle {
    /// Cancel the pending frame and free the tick closure. Idempotent.
    pub fn stop(&self) {
        if !self.alive.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // stop() may run inside the tick itself (host disposes from an event
        // callback), so the closure is freed on a later microtask
        if let Some(closure) = self.tick.borrow_mut().take() {
            wasm_bindgen_futures::spawn_local(async move { drop(closure) });
        }
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(tick: &TickSlot) -> Option<i32> {
    let w = web::window()?;
    let slot = tick.borrow();
    let closure = slot.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
}

pub fn start_loop(viewer: SharedViewer) -> LoopHandle {
    let alive = Rc::new(Cell::new(true));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: TickSlot = Rc::new(RefCell::new(None));

    let tick_clone = tick.clone();
    let alive_tick = alive.clone();
    let raf_tick = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !alive_tick.get() {
            return;
        }
        viewer.borrow_mut().frame();
        viewer::pump(&viewer);
        if alive_tick.get() {
            raf_tick.set(request_frame(&tick_clone));
        }
    }) as Box<dyn FnMut()>));
    raf_id.set(request_frame(&tick));

    LoopHandle {
        alive,
        raf_id,
        tick,
    }
}

async fn create_renderer(
    canvas: web::HtmlCanvasElement,
    radius: f32,
) -> Option<Renderer<'static>> {
    let instance = wgpu::Instance::default();
    let (w, h) = (canvas.width().max(1), canvas.height().max(1));
    let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
        Ok(s) => s,
        Err(e) => {
            log::error!("WebGPU surface error: {:?}", e);
            return None;
        }
    };
    match Renderer::new(&instance, surface, w, h, radius).await {
        Ok(r) => {
            log::info!("[gpu] renderer ready ({}x{})", w, h);
            Some(r)
        }
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Create the WebGPU renderer for the viewer's canvas and hand it over. If
/// the viewer was disposed meanwhile, the renderer is dropped and the canvas
/// claim that dispose left in place is released here.
pub async fn init_gpu(viewer: SharedViewer) {
    let (canvas, radius, disposed) = {
        let v = viewer.borrow();
        (v.canvas.clone(), v.session.config().sphere_radius, v.disposed)
    };
    let renderer = if disposed {
        None
    } else {
        create_renderer(canvas, radius).await
    };

    let mut v = viewer.borrow_mut();
    let release = v.claim.gpu_init_settled();
    if v.disposed {
        if let Some(mut r) = renderer {
            r.dispose();
        }
        if release {
            dom::release_canvas(&v.canvas);
            log::debug!("[gpu] init finished after dispose; canvas released");
        }
        return;
    }
    if let Some(r) = renderer {
        v.attach_renderer(r);
    }
}
