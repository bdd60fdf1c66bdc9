use crate::dom::{self, Listeners, ResizeWatch};
use crate::viewer::SharedViewer;
use web_sys as web;

fn sync(viewer: &SharedViewer) {
    let s = viewer.borrow();
    if !s.disposed {
        dom::sync_canvas_backing_size(&s.canvas);
    }
}

/// Follow both window resizes (devicePixelRatio changes ride along) and
/// layout changes of the canvas container. Returns the observer, if the
/// browser has one, so dispose can disconnect it.
pub fn wire_resize_handlers(
    viewer: &SharedViewer,
    listeners: &mut Listeners,
) -> Option<ResizeWatch> {
    if let Some(window) = web::window() {
        let v = viewer.clone();
        listeners.add(window.as_ref(), "resize", move |_| sync(&v));
    }

    let canvas = viewer.borrow().canvas.clone();
    let v = viewer.clone();
    match ResizeWatch::observe(canvas.as_ref(), move || sync(&v)) {
        Ok(watch) => Some(watch),
        Err(e) => {
            log::warn!("[dom] {}; following window resizes only", e);
            None
        }
    }
}
