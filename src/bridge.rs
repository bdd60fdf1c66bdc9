use crate::host_event::HostEvent;
use crate::viewer::SharedViewer;
use pano_core::SaveRequest;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};

#[derive(Default)]
pub struct HostCallbacks {
    pub on_event: Option<js_sys::Function>,
    /// `(tourId, sceneJson) => Promise`
    pub persistence: Option<js_sys::Function>,
}

pub fn emit(viewer: &SharedViewer, ev: &HostEvent) {
    let cb = viewer.borrow().host.on_event.clone();
    let Some(cb) = cb else {
        return;
    };
    let json = match ev.to_json() {
        Ok(s) => s,
        Err(e) => {
            log::error!("[host] event encode failed: {}", e);
            return;
        }
    };
    let payload = js_sys::JSON::parse(&json).unwrap_or_else(|_| JsValue::from_str(&json));
    if let Err(e) = cb.call1(&JsValue::NULL, &payload) {
        log::warn!("[host] onEvent threw: {:?}", e);
    }
}

/// Hand a scene snapshot to the host's persistence function and record the
/// outcome in the session's save ledger.
pub fn persist(viewer: &SharedViewer, req: SaveRequest) {
    let scene_json = match serde_json::to_string(&req.scene) {
        Ok(s) => s,
        Err(e) => {
            log::error!("[save] encode scene {}: {}", req.scene.id, e);
            return;
        }
    };
    let persist_fn = viewer.borrow().host.persistence.clone();
    let Some(persist_fn) = persist_fn else {
        emit(
            viewer,
            &HostEvent::SaveRequested {
                tour_id: req.tour_id.clone(),
                scene_id: req.scene.id.clone(),
                revision: req.revision,
                scene_json,
            },
        );
        return;
    };
    let called = persist_fn.call2(
        &JsValue::NULL,
        &JsValue::from_str(&req.tour_id),
        &JsValue::from_str(&scene_json),
    );
    match called {
        Err(e) => finish(viewer, &req, Err(format!("{:?}", e))),
        Ok(ret) => match ret.dyn_into::<js_sys::Promise>() {
            Ok(promise) => {
                let viewer = viewer.clone();
                spawn_local(async move {
                    let outcome = JsFuture::from(promise)
                        .await
                        .map(|_| ())
                        .map_err(|e| format!("{:?}", e));
                    finish(&viewer, &req, outcome);
                });
            }
            // plain return value: treat as a synchronous success
            Err(_) => finish(viewer, &req, Ok(())),
        },
    }
}

fn finish(viewer: &SharedViewer, req: &SaveRequest, outcome: Result<(), String>) {
    {
        let mut v = viewer.borrow_mut();
        if v.disposed {
            return;
        }
        v.session
            .resolve_save(&req.scene.id, req.revision, outcome.is_ok());
    }
    match outcome {
        Ok(()) => log::debug!("[save] scene {} r{} stored", req.scene.id, req.revision),
        Err(message) => {
            log::error!("[save] scene {} r{} failed: {}", req.scene.id, req.revision, message);
            emit(
                viewer,
                &HostEvent::SaveFailed {
                    scene_id: req.scene.id.clone(),
                    revision: req.revision,
                    message,
                },
            );
        }
    }
}
