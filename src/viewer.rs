use crate::bridge::{self, HostCallbacks};
use crate::constants::{CURSOR_DEFAULT, CURSOR_EDIT, MAX_FRAME_DT_SEC};
use crate::dom;
use crate::fetch;
use crate::host_event::HostEvent;
use crate::input::PointerTracker;
use crate::overlay;
use crate::surface::CanvasClaim;
use image::RgbaImage;
use instant::Instant;
use pano_core::constants::sphere_center_vec3;
use pano_core::{Camera, Mode, OrbitControls, SessionEvent, TourSession};
use pano_render::Renderer;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Everything one `TourViewer` owns. Shared by the frame loop, the DOM
/// listeners and in-flight loads through `Rc<RefCell<_>>`; nothing is global.
pub struct ViewerState {
    pub session: TourSession,
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub renderer: Option<Renderer<'static>>,
    pub canvas: web::HtmlCanvasElement,
    pub pointer: PointerTracker,
    pub host: HostCallbacks,
    pub hovering: bool,
    pub disposed: bool,
    pub claim: CanvasClaim,
    /// Accepted panorama that arrived before the GPU was ready.
    pending_panorama: Option<RgbaImage>,
    icon_queue: Vec<String>,
    last_instant: Instant,
}

pub type SharedViewer = Rc<RefCell<ViewerState>>;

impl ViewerState {
    pub fn new(session: TourSession, canvas: web::HtmlCanvasElement) -> Self {
        let config = session.config().clone();
        let aspect = canvas.width().max(1) as f32 / canvas.height().max(1) as f32;
        let camera = Camera::panorama(sphere_center_vec3(), aspect, config.fov_deg);
        Self {
            session,
            camera,
            orbit: OrbitControls::new(&config),
            renderer: None,
            canvas,
            pointer: PointerTracker::default(),
            host: HostCallbacks::default(),
            hovering: false,
            disposed: false,
            claim: CanvasClaim::default(),
            pending_panorama: None,
            icon_queue: Vec::new(),
            last_instant: Instant::now(),
        }
    }

    /// Install the GPU renderer once it is ready.
    pub fn attach_renderer(&mut self, mut renderer: Renderer<'static>) {
        if let Some(img) = self.pending_panorama.take() {
            renderer.set_panorama(&img);
        }
        self.renderer = Some(renderer);
    }

    pub fn apply_panorama(&mut self, img: RgbaImage) {
        match &mut self.renderer {
            Some(r) => r.set_panorama(&img),
            None => self.pending_panorama = Some(img),
        }
    }

    /// Camera with the latest orbit angles and canvas aspect.
    pub fn sync_camera(&mut self) {
        self.camera
            .set_viewport(self.canvas.width(), self.canvas.height());
        self.orbit.apply(&mut self.camera);
    }

    /// One requestAnimationFrame tick: advance fades, billboard, draw.
    pub fn frame(&mut self) {
        if self.disposed {
            return;
        }
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_instant = now;

        self.session.tick(dt_sec);
        self.sync_camera();
        self.session.billboard_markers(self.camera.eye);

        let (w, h) = (self.canvas.width(), self.canvas.height());
        if let Some(r) = &mut self.renderer {
            r.resize_if_needed(w, h);
            let missing = r.take_missing_icons(self.session.markers());
            self.icon_queue.extend(missing);
            if let Err(e) = r.render(&self.camera, self.session.markers(), self.session.opacity()) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    pub fn cursor_for_mode(&self) -> &'static str {
        match self.session.mode() {
            Mode::Edit => CURSOR_EDIT,
            Mode::View => CURSOR_DEFAULT,
        }
    }
}

/// Route queued session events to the renderer, the DOM and the host page.
/// Never holds a borrow while calling into JS, so host callbacks may call
/// back into the viewer.
pub fn pump(viewer: &SharedViewer) {
    let (events, icons) = {
        let mut v = viewer.borrow_mut();
        if v.disposed {
            return;
        }
        (v.session.drain_events(), std::mem::take(&mut v.icon_queue))
    };
    for ev in events {
        match &ev {
            SessionEvent::SceneChanged { .. } => {
                if let Some(doc) = dom::window_document() {
                    overlay::hide_info(&doc);
                }
                let ticket = viewer.borrow_mut().session.begin_panorama_load();
                if let Some(ticket) = ticket {
                    fetch::spawn_panorama_load(viewer.clone(), ticket);
                }
            }
            SessionEvent::ShowInfo(info) => {
                if let Some(doc) = dom::window_document() {
                    overlay::show_info(&doc, info);
                }
            }
            SessionEvent::ModeChanged(_) => {
                let v = viewer.borrow();
                dom::set_cursor(&v.canvas, v.cursor_for_mode());
            }
            SessionEvent::SaveRequested(req) => {
                bridge::persist(viewer, req.clone());
            }
            _ => {}
        }
        if let Some(host_ev) = HostEvent::from_session(&ev) {
            bridge::emit(viewer, &host_ev);
        }
    }
    for url in icons {
        fetch::spawn_icon_load(viewer.clone(), url);
    }
}
