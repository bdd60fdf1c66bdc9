use crate::dom::{self, Listeners};
use crate::keymap::{action_for_key, KeyAction};
use crate::overlay;
use crate::viewer::{self, SharedViewer};
use pano_core::constants::KEY_ROTATE_STEP_DEG;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keys typed into host form fields belong to the host.
fn is_text_entry(ev: &web::Event) -> bool {
    let Some(el) = ev.target().and_then(|t| t.dyn_into::<web::HtmlElement>().ok()) else {
        return false;
    };
    if el.is_content_editable() {
        return true;
    }
    matches!(
        el.tag_name().to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT"
    )
}

pub fn wire_keyboard_handlers(viewer: &SharedViewer, listeners: &mut Listeners) {
    let Some(window) = web::window() else {
        return;
    };
    let target: &web::EventTarget = window.as_ref();

    let v = viewer.clone();
    listeners.add(target, "keydown", move |ev| {
        if is_text_entry(&ev) {
            return;
        }
        let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        let Some(action) = action_for_key(&kev.key(), KEY_ROTATE_STEP_DEG) else {
            return;
        };
        ev.prevent_default();
        match action {
            KeyAction::Look { yaw_deg, pitch_deg } => {
                let mut s = v.borrow_mut();
                if !s.disposed {
                    s.orbit
                        .rotate_by(yaw_deg.to_radians(), pitch_deg.to_radians());
                }
            }
            KeyAction::Dismiss => {
                // first Escape closes the info panel, the next one the form
                if let Some(doc) = dom::window_document() {
                    if overlay::is_info_visible(&doc) {
                        overlay::hide_info(&doc);
                        return;
                    }
                }
                let closed = {
                    let mut s = v.borrow_mut();
                    !s.disposed && s.session.cancel_form()
                };
                if closed {
                    viewer::pump(&v);
                }
            }
        }
    });
}
