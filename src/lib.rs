#![cfg(target_arch = "wasm32")]
use pano_core::{HotspotForm, Mode, Tour, TourSession, ViewerConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod bridge;
mod constants;
mod dom;
mod events;
mod fetch;
mod frame;
mod host_event;
mod input;
mod keymap;
mod overlay;
mod surface;
mod viewer;

use viewer::{SharedViewer, ViewerState};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("pano-web loaded");
    Ok(())
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_mode(mode: &str) -> Result<Mode, JsValue> {
    match mode {
        "edit" => Ok(Mode::Edit),
        "view" => Ok(Mode::View),
        other => Err(JsValue::from_str(&format!("unknown mode {:?}", other))),
    }
}

/// One panorama tour bound to one canvas. Call `dispose()` before dropping
/// the canvas or attaching another viewer to it.
#[wasm_bindgen]
pub struct TourViewer {
    state: SharedViewer,
    frame_loop: Option<frame::LoopHandle>,
    listeners: dom::Listeners,
    resize: Option<dom::ResizeWatch>,
}

impl TourViewer {
    fn live(&self) -> Result<(), JsValue> {
        if self.state.borrow().disposed {
            Err(JsValue::from_str("viewer disposed"))
        } else {
            Ok(())
        }
    }

    /// Run `f` on the session, then flush whatever events it queued.
    fn with_session<T>(
        &self,
        f: impl FnOnce(&mut TourSession) -> Result<T, pano_core::TourError>,
    ) -> Result<T, JsValue> {
        self.live()?;
        let out = f(&mut self.state.borrow_mut().session);
        viewer::pump(&self.state);
        out.map_err(js_error)
    }
}

#[wasm_bindgen]
impl TourViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        tour_json: &str,
        config_json: Option<String>,
    ) -> Result<TourViewer, JsValue> {
        let canvas = dom::canvas_by_id(canvas_id).map_err(js_error)?;
        let tour = Tour::from_json(tour_json).map_err(js_error)?;
        let config = match config_json {
            Some(text) => ViewerConfig::from_json(&text).map_err(js_error)?,
            None => ViewerConfig::default(),
        };
        dom::claim_canvas(&canvas).map_err(js_error)?;
        dom::sync_canvas_backing_size(&canvas);

        log::info!(
            "[tour] {} ({} scenes) on #{}",
            tour.title,
            tour.scenes.len(),
            canvas_id
        );
        let session = TourSession::new(tour, config);
        let state: SharedViewer = Rc::new(RefCell::new(ViewerState::new(session, canvas.clone())));
        {
            let s = state.borrow();
            dom::set_cursor(&canvas, s.cursor_for_mode());
        }

        let mut listeners = dom::Listeners::default();
        events::wire_pointer_handlers(&state, &mut listeners);
        events::wire_keyboard_handlers(&state, &mut listeners);
        let resize = events::wire_resize_handlers(&state, &mut listeners);
        log::debug!("[dom] {} listeners attached", listeners.len());

        // flag set before the future first runs so an immediate dispose sees it
        state.borrow_mut().claim.gpu_init_started();
        spawn_local(frame::init_gpu(state.clone()));
        let frame_loop = frame::start_loop(state.clone());
        // initial SceneChanged kicks off the first panorama load
        viewer::pump(&state);

        Ok(TourViewer {
            state,
            frame_loop: Some(frame_loop),
            listeners,
            resize,
        })
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode = parse_mode(mode)?;
        self.with_session(|s| {
            s.set_mode(mode);
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = switchScene)]
    pub fn switch_scene(&self, scene_id: &str) -> Result<(), JsValue> {
        self.with_session(|s| s.switch_scene(scene_id))
    }

    /// Submit the open hotspot form; returns the hotspot id.
    #[wasm_bindgen(js_name = submitHotspot)]
    pub fn submit_hotspot(&self, form_json: &str) -> Result<String, JsValue> {
        let form: HotspotForm = serde_json::from_str(form_json).map_err(js_error)?;
        self.with_session(|s| s.submit_form(form).map(|edit| edit.hotspot_id))
    }

    #[wasm_bindgen(js_name = cancelForm)]
    pub fn cancel_form(&self) -> Result<bool, JsValue> {
        self.with_session(|s| Ok(s.cancel_form()))
    }

    #[wasm_bindgen(js_name = editHotspot)]
    pub fn edit_hotspot(&self, hotspot_id: &str) -> Result<(), JsValue> {
        self.with_session(|s| s.edit_hotspot(hotspot_id))
    }

    #[wasm_bindgen(js_name = removeHotspot)]
    pub fn remove_hotspot(&self, hotspot_id: &str) -> Result<(), JsValue> {
        self.with_session(|s| s.remove_hotspot(hotspot_id).map(|_| ()))
    }

    /// Register the host's event listener. Replaces any earlier one.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: js_sys::Function) {
        self.state.borrow_mut().host.on_event = Some(callback);
    }

    /// Register `(tourId, sceneJson) => Promise` used to persist edits.
    #[wasm_bindgen(js_name = setPersistence)]
    pub fn set_persistence(&self, persist: js_sys::Function) {
        self.state.borrow_mut().host.persistence = Some(persist);
    }

    /// Re-send the latest state of every scene whose save failed.
    #[wasm_bindgen(js_name = retryFailedSaves)]
    pub fn retry_failed_saves(&self) -> Result<u32, JsValue> {
        self.with_session(|s| Ok(s.retry_failed_saves() as u32))
    }

    #[wasm_bindgen(js_name = currentSceneId)]
    pub fn current_scene_id(&self) -> Option<String> {
        self.state
            .borrow()
            .session
            .current_scene_id()
            .map(str::to_string)
    }

    #[wasm_bindgen(js_name = tourJson)]
    pub fn tour_json(&self) -> Result<String, JsValue> {
        self.state.borrow().session.tour().to_json().map_err(js_error)
    }

    /// Stop the loop, detach listeners, release GPU resources and the canvas.
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
        self.listeners.remove_all();
        if let Some(mut resize) = self.resize.take() {
            resize.disconnect();
        }
        let mut s = self.state.borrow_mut();
        if s.disposed {
            return;
        }
        s.disposed = true;
        s.session.shutdown();
        if let Some(mut r) = s.renderer.take() {
            r.dispose();
        }
        s.host = bridge::HostCallbacks::default();
        if s.claim.dispose() {
            dom::release_canvas(&s.canvas);
        } else if s.claim.gpu_init_pending() {
            log::debug!("[tour] GPU init in flight; canvas stays claimed until it settles");
        }
        if let Some(doc) = dom::window_document() {
            overlay::hide_info(&doc);
        }
        log::info!("[tour] viewer disposed");
    }
}

impl Drop for TourViewer {
    fn drop(&mut self) {
        self.dispose();
    }
}
