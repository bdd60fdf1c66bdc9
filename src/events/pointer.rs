use crate::constants::{CLICK_TOLERANCE_PX, CURSOR_DRAG, CURSOR_HOTSPOT};
use crate::dom::{self, Listeners};
use crate::input::{pointer_canvas_px, PointerRelease};
use crate::viewer::{self, SharedViewer};
use glam::Vec2;
use pano_core::{screen_to_world_ray, Interaction, Mode, Ray};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer_handlers(viewer: &SharedViewer, listeners: &mut Listeners) {
    let canvas = viewer.borrow().canvas.clone();
    let target: &web::EventTarget = canvas.as_ref();

    let v = viewer.clone();
    listeners.add(target, "pointerdown", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
            on_pointer_down(&v, ev);
        }
    });
    let v = viewer.clone();
    listeners.add(target, "pointermove", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
            on_pointer_move(&v, ev);
        }
    });
    let v = viewer.clone();
    listeners.add(target, "pointerup", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
            on_pointer_up(&v, ev);
        }
    });
    for kind in ["pointercancel", "pointerleave"] {
        let v = viewer.clone();
        listeners.add(target, kind, move |_| {
            let mut s = v.borrow_mut();
            if s.disposed {
                return;
            }
            s.pointer.cancel();
            s.orbit.end_drag();
            let cursor = s.cursor_for_mode();
            dom::set_cursor(&s.canvas, cursor);
        });
    }
}

fn ray_at(s: &mut viewer::ViewerState, px: Vec2) -> Ray {
    s.sync_camera();
    screen_to_world_ray(
        &s.camera,
        s.canvas.width() as f32,
        s.canvas.height() as f32,
        px.x,
        px.y,
    )
}

fn on_pointer_down(viewer: &SharedViewer, ev: &web::PointerEvent) {
    let mut s = viewer.borrow_mut();
    if s.disposed || ev.button() != 0 {
        return;
    }
    let pos = pointer_canvas_px(ev, &s.canvas);
    _ = s.canvas.set_pointer_capture(ev.pointer_id());
    s.pointer.down(pos);
    s.orbit.begin_drag(pos);
}

fn on_pointer_move(viewer: &SharedViewer, ev: &web::PointerEvent) {
    let mut s = viewer.borrow_mut();
    if s.disposed {
        return;
    }
    let pos = pointer_canvas_px(ev, &s.canvas);
    if s.pointer.is_down() {
        let travelled = s.pointer.moved(pos);
        let h = s.canvas.height() as f32;
        s.orbit.drag_to(pos, h);
        if travelled > CLICK_TOLERANCE_PX {
            dom::set_cursor(&s.canvas, CURSOR_DRAG);
        }
        return;
    }
    if s.session.mode() != Mode::View {
        return;
    }
    let ray = ray_at(&mut s, pos);
    let over = s.session.hover(&ray).is_some();
    if over != s.hovering {
        s.hovering = over;
        let cursor = if over {
            CURSOR_HOTSPOT
        } else {
            s.cursor_for_mode()
        };
        dom::set_cursor(&s.canvas, cursor);
    }
}

fn on_pointer_up(viewer: &SharedViewer, ev: &web::PointerEvent) {
    {
        let mut s = viewer.borrow_mut();
        if s.disposed {
            return;
        }
        let pos = pointer_canvas_px(ev, &s.canvas);
        _ = s.canvas.release_pointer_capture(ev.pointer_id());
        s.orbit.end_drag();
        let cursor = s.cursor_for_mode();
        dom::set_cursor(&s.canvas, cursor);
        let PointerRelease::Click(at) = s.pointer.up(pos, CLICK_TOLERANCE_PX) else {
            return;
        };
        let ray = ray_at(&mut s, at);
        match s.session.activate(&ray) {
            Ok(Interaction::BrokenLink(target)) => {
                log::warn!("[nav] hotspot points at missing scene {:?}", target);
            }
            Ok(Interaction::Navigating(target)) => log::info!("[nav] -> {}", target),
            Ok(_) => {}
            Err(e) => log::warn!("[pick] {}", e),
        }
    }
    viewer::pump(viewer);
}
