use crate::constants::CANVAS_ATTACHED_ATTR;
use crate::surface;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn canvas_by_id(id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?;
    el.dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("#{} is not a canvas: {:?}", id, e)))
}

/// Keep the canvas backing store at CSS size × devicePixelRatio. The host
/// sizes the canvas with CSS; the backing store never feeds back into layout.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    let Some(w) = web::window() else {
        return;
    };
    let rect = canvas.get_bounding_client_rect();
    let Some((w_px, h_px)) =
        surface::backing_size(rect.width(), rect.height(), w.device_pixel_ratio())
    else {
        return;
    };
    if canvas.width() != w_px || canvas.height() != h_px {
        canvas.set_width(w_px);
        canvas.set_height(h_px);
    }
}

/// Claim the canvas for one viewer. Fails if another live viewer holds it.
pub fn claim_canvas(canvas: &web::HtmlCanvasElement) -> anyhow::Result<()> {
    if canvas.has_attribute(CANVAS_ATTACHED_ATTR) {
        anyhow::bail!("canvas #{} already has a viewer attached", canvas.id());
    }
    canvas
        .set_attribute(CANVAS_ATTACHED_ATTR, "true")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

pub fn release_canvas(canvas: &web::HtmlCanvasElement) {
    _ = canvas.remove_attribute(CANVAS_ATTACHED_ATTR);
}

pub fn set_cursor(canvas: &web::HtmlCanvasElement, cursor: &str) {
    _ = canvas.style().set_property("cursor", cursor);
}

struct Registered {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Event listeners owned by one viewer, removed together on dispose.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<Registered>,
}

impl Listeners {
    pub fn add(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        if target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("[dom] could not add {} listener", kind);
            return;
        }
        self.entries.push(Registered {
            target: target.clone(),
            kind,
            closure,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn remove_all(&mut self) {
        for r in self.entries.drain(..) {
            _ = r
                .target
                .remove_event_listener_with_callback(r.kind, r.closure.as_ref().unchecked_ref());
            // the handler being removed may be the one currently running
            let closure = r.closure;
            wasm_bindgen_futures::spawn_local(async move { drop(closure) });
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// Calls back whenever layout resizes the observed element, whether or not
/// the window itself changed size. Disconnects on drop.
pub struct ResizeWatch {
    observer: web::ResizeObserver,
    callback: Option<Closure<dyn FnMut(js_sys::Array)>>,
}

impl ResizeWatch {
    pub fn observe(el: &web::Element, mut on_resize: impl FnMut() + 'static) -> anyhow::Result<Self> {
        let callback = Closure::wrap(
            Box::new(move |_entries: js_sys::Array| on_resize()) as Box<dyn FnMut(js_sys::Array)>
        );
        let observer = web::ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!(format!("ResizeObserver unavailable: {:?}", e)))?;
        observer.observe(el);
        Ok(Self {
            observer,
            callback: Some(callback),
        })
    }

    pub fn disconnect(&mut self) {
        self.observer.disconnect();
        if let Some(closure) = self.callback.take() {
            wasm_bindgen_futures::spawn_local(async move { drop(closure) });
        }
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.disconnect();
    }
}
