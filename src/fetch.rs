use crate::bridge;
use crate::host_event::HostEvent;
use crate::viewer::SharedViewer;
use pano_core::LoadTicket;
use pano_render::texture::{decode_icon, decode_panorama};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

// WebGPU guarantees at least this for 2D textures
const FALLBACK_MAX_TEXTURE_SIDE: u32 = 8192;

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!(format!("{:?}", e))
}

pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?;
    let resp: web::Response = resp.dyn_into().map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("HTTP {} for {}", resp.status(), url);
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

pub fn spawn_panorama_load(viewer: SharedViewer, ticket: LoadTicket) {
    spawn_local(async move {
        let max_side = viewer
            .borrow()
            .renderer
            .as_ref()
            .map(|r| r.max_texture_dimension())
            .unwrap_or(FALLBACK_MAX_TEXTURE_SIDE);
        let result = match fetch_bytes(&ticket.url).await {
            Ok(bytes) => decode_panorama(&bytes, max_side),
            Err(e) => Err(e),
        };
        let failed = {
            let mut v = viewer.borrow_mut();
            if v.disposed {
                return;
            }
            match result {
                Ok(img) => {
                    if v.session.accept_panorama(&ticket) {
                        v.apply_panorama(img);
                    }
                    None
                }
                Err(e) if v.session.is_load_current(&ticket) => {
                    // keep whatever is displayed
                    log::error!("[load] {} failed: {:?}", ticket.url, e);
                    Some(e.to_string())
                }
                Err(_) => None,
            }
        };
        if let Some(message) = failed {
            bridge::emit(
                &viewer,
                &HostEvent::PanoramaFailed {
                    scene_id: ticket.scene_id.clone(),
                    url: ticket.url.clone(),
                    message,
                },
            );
        }
    });
}

pub fn spawn_icon_load(viewer: SharedViewer, url: String) {
    spawn_local(async move {
        let result = match fetch_bytes(&url).await {
            Ok(bytes) => decode_icon(&bytes),
            Err(e) => Err(e),
        };
        let mut v = viewer.borrow_mut();
        if v.disposed {
            return;
        }
        let Some(r) = v.renderer.as_mut() else {
            return;
        };
        match result {
            Ok(img) => r.insert_icon(&url, &img),
            Err(e) => {
                log::debug!("[load] icon {}: {:?}", url, e);
                r.icon_failed(&url);
            }
        }
    });
}
