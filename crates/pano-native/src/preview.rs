use glam::Vec2;
use image::RgbaImage;
use pano_core::constants::{sphere_center_vec3, KEY_ROTATE_STEP_DEG};
use pano_core::{
    screen_to_world_ray, Camera, FormTarget, HotspotForm, HotspotKind, Interaction, LoadTicket,
    Mode, OrbitControls, Ray, SessionEvent, TourSession, TourStore,
};
use pano_native::{read_asset, JsonFileStore};
use pano_render::texture::{decode_icon, decode_panorama};
use pano_render::Renderer;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{CursorIcon, Window, WindowBuilder};

const CLICK_TOLERANCE_PX: f32 = 6.0;
const MAX_FRAME_DT_SEC: f32 = 0.1;

enum Loaded {
    Panorama(LoadTicket, anyhow::Result<RgbaImage>),
    Icon(String, anyhow::Result<RgbaImage>),
}

struct Previewer {
    window: Arc<Window>,
    session: TourSession,
    camera: Camera,
    orbit: OrbitControls,
    renderer: Renderer<'static>,
    store: JsonFileStore,
    base_dir: PathBuf,
    note: String,
    tx: mpsc::Sender<Loaded>,
    rx: mpsc::Receiver<Loaded>,
    cursor: Vec2,
    pressed_at: Option<Vec2>,
    travelled: f32,
    hovering: bool,
    last_frame: Instant,
}

pub fn run(session: TourSession, store: JsonFileStore, note: String) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("{} (pano)", session.tour().title))
            .build(&event_loop)?,
    );
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let size = window.inner_size();
    let renderer = pollster::block_on(Renderer::new(
        &instance,
        surface,
        size.width.max(1),
        size.height.max(1),
        session.config().sphere_radius,
    ))?;

    let config = session.config().clone();
    let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
    let (tx, rx) = mpsc::channel();
    let base_dir = store.base_dir();
    let mut app = Previewer {
        window: window.clone(),
        camera: Camera::panorama(sphere_center_vec3(), aspect, config.fov_deg),
        orbit: OrbitControls::new(&config),
        session,
        renderer,
        store,
        base_dir,
        note,
        tx,
        rx,
        cursor: Vec2::ZERO,
        pressed_at: None,
        travelled: 0.0,
        hovering: false,
        last_frame: Instant::now(),
    };
    log::info!("Tab: edit/view  1-9: scenes  Enter: place note  E: edit  Del: remove  R: retry saves");
    app.pump();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                app.shutdown();
                elwt.exit();
            }
            WindowEvent::Resized(size) => app.renderer.resize_if_needed(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                app.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => app.mouse_button(state),
            WindowEvent::KeyboardInput { event, .. } => app.key(&event),
            _ => {}
        },
        Event::AboutToWait => {
            if let Err(e) = app.frame() {
                log::error!("render error: {:?}", e);
                app.shutdown();
                elwt.exit();
                return;
            }
            app.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}

impl Previewer {
    fn ray_at(&mut self, px: Vec2) -> Ray {
        let size = self.window.inner_size();
        self.camera.set_viewport(size.width, size.height);
        self.orbit.apply(&mut self.camera);
        screen_to_world_ray(
            &self.camera,
            size.width as f32,
            size.height as f32,
            px.x,
            px.y,
        )
    }

    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt_sec = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_frame = now;

        self.drain_loads();
        self.session.tick(dt_sec);
        let size = self.window.inner_size();
        self.camera.set_viewport(size.width, size.height);
        self.orbit.apply(&mut self.camera);
        self.session.billboard_markers(self.camera.eye);

        for url in self.renderer.take_missing_icons(self.session.markers()) {
            self.spawn_icon_load(url);
        }
        self.renderer.resize_if_needed(size.width, size.height);
        let result = self.renderer.render(
            &self.camera,
            self.session.markers(),
            self.session.opacity(),
        );
        self.pump();
        match result {
            Err(wgpu::SurfaceError::OutOfMemory) => Err(wgpu::SurfaceError::OutOfMemory),
            Err(e) => {
                log::warn!("[render] frame skipped: {:?}", e);
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    fn spawn_panorama_load(&self, ticket: LoadTicket) {
        let tx = self.tx.clone();
        let dir = self.base_dir.clone();
        let max_side = self.renderer.max_texture_dimension();
        thread::spawn(move || {
            let result = read_asset(&dir, &ticket.url).and_then(|b| decode_panorama(&b, max_side));
            _ = tx.send(Loaded::Panorama(ticket, result));
        });
    }

    fn spawn_icon_load(&self, url: String) {
        let tx = self.tx.clone();
        let dir = self.base_dir.clone();
        thread::spawn(move || {
            let result = read_asset(&dir, &url).and_then(|b| decode_icon(&b));
            _ = tx.send(Loaded::Icon(url, result));
        });
    }

    fn drain_loads(&mut self) {
        while let Ok(loaded) = self.rx.try_recv() {
            match loaded {
                Loaded::Panorama(ticket, Ok(img)) => {
                    if self.session.accept_panorama(&ticket) {
                        self.renderer.set_panorama(&img);
                    } else {
                        log::debug!("[load] dropped stale panorama {}", ticket.url);
                    }
                }
                Loaded::Panorama(ticket, Err(e)) => {
                    if self.session.is_load_current(&ticket) {
                        log::error!("[load] {} failed: {:?}", ticket.url, e);
                    }
                }
                Loaded::Icon(url, Ok(img)) => self.renderer.insert_icon(&url, &img),
                Loaded::Icon(url, Err(e)) => {
                    log::debug!("[load] icon {}: {:?}", url, e);
                    self.renderer.icon_failed(&url);
                }
            }
        }
    }

    fn pump(&mut self) {
        for ev in self.session.drain_events() {
            match ev {
                SessionEvent::SceneChanged { scene_id, .. } => {
                    if let Some(scene) = self.session.current_scene() {
                        self.window
                            .set_title(&format!("{} / {}", self.session.tour().title, scene.title));
                    }
                    log::info!("[nav] scene {}", scene_id);
                    if let Some(ticket) = self.session.begin_panorama_load() {
                        self.spawn_panorama_load(ticket);
                    }
                }
                SessionEvent::ShowInfo(info) => {
                    log::info!("[info] {}: {}", info.title, info.description);
                }
                SessionEvent::FormOpened(open) => match open.target {
                    FormTarget::New { position } => log::info!(
                        "[edit] new hotspot at ({:.1}, {:.1}, {:.1}); Enter to place, Esc to cancel",
                        position.x,
                        position.y,
                        position.z
                    ),
                    FormTarget::Existing { hotspot_id } => {
                        log::info!("[edit] editing {}; Enter to save, Esc to cancel", hotspot_id)
                    }
                },
                SessionEvent::ModeChanged(mode) => log::info!("[mode] {:?}", mode),
                SessionEvent::SaveRequested(req) => {
                    let ok = match self.store.save_scene(&req.tour_id, &req.scene) {
                        Ok(()) => true,
                        Err(e) => {
                            log::error!("[save] scene {} failed: {}", req.scene.id, e);
                            false
                        }
                    };
                    self.session.resolve_save(&req.scene.id, req.revision, ok);
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    fn cursor_moved(&mut self, at: Vec2) {
        if self.pressed_at.is_some() {
            self.travelled += at.distance(self.cursor);
            self.cursor = at;
            let h = self.window.inner_size().height as f32;
            self.orbit.drag_to(at, h);
            if self.travelled > CLICK_TOLERANCE_PX {
                self.window.set_cursor_icon(CursorIcon::Grabbing);
            }
            return;
        }
        self.cursor = at;
        if self.session.mode() != Mode::View {
            return;
        }
        let ray = self.ray_at(at);
        let over = self.session.hover(&ray).is_some();
        if over != self.hovering {
            self.hovering = over;
            self.window.set_cursor_icon(if over {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            });
        }
    }

    fn mouse_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_at = Some(self.cursor);
                self.travelled = 0.0;
                self.orbit.begin_drag(self.cursor);
            }
            ElementState::Released => {
                self.orbit.end_drag();
                self.window.set_cursor_icon(CursorIcon::Default);
                if self.pressed_at.take().is_none() || self.travelled > CLICK_TOLERANCE_PX {
                    return;
                }
                let ray = self.ray_at(self.cursor);
                match self.session.activate(&ray) {
                    Ok(Interaction::BrokenLink(target)) => {
                        log::warn!("[nav] hotspot points at missing scene {:?}", target)
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("[pick] {}", e),
                }
                self.pump();
            }
        }
    }

    /// Hotspot whose marker is under the cursor, in either mode.
    fn hotspot_under_cursor(&mut self) -> Option<String> {
        let ray = self.ray_at(self.cursor);
        self.session
            .markers()
            .intersect(&ray)
            .map(|hit| hit.hotspot_id.to_string())
    }

    fn key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let step = KEY_ROTATE_STEP_DEG.to_radians();
        let result = match &event.logical_key {
            Key::Named(NamedKey::Tab) => {
                let next = match self.session.mode() {
                    Mode::View => Mode::Edit,
                    Mode::Edit => Mode::View,
                };
                self.session.set_mode(next);
                Ok(())
            }
            Key::Named(NamedKey::Escape) => {
                self.session.cancel_form();
                Ok(())
            }
            Key::Named(NamedKey::Enter) => self.submit_open_form(),
            Key::Named(NamedKey::Delete) => match self.hotspot_under_cursor() {
                Some(id) => self.session.remove_hotspot(&id).map(|_| ()),
                None => Ok(()),
            },
            Key::Named(NamedKey::ArrowLeft) => {
                self.orbit.rotate_by(-step, 0.0);
                Ok(())
            }
            Key::Named(NamedKey::ArrowRight) => {
                self.orbit.rotate_by(step, 0.0);
                Ok(())
            }
            Key::Named(NamedKey::ArrowUp) => {
                self.orbit.rotate_by(0.0, step);
                Ok(())
            }
            Key::Named(NamedKey::ArrowDown) => {
                self.orbit.rotate_by(0.0, -step);
                Ok(())
            }
            Key::Character(c) => match c.as_str() {
                "e" | "E" => match self.hotspot_under_cursor() {
                    Some(id) => self.session.edit_hotspot(&id),
                    None => Ok(()),
                },
                "r" | "R" => {
                    let n = self.session.retry_failed_saves();
                    log::info!("[save] retrying {} scenes", n);
                    Ok(())
                }
                digit => match digit.parse::<usize>() {
                    Ok(n) if (1..=9).contains(&n) => {
                        match self.session.tour().scenes.get(n - 1).map(|s| s.id.clone()) {
                            Some(id) => self.session.switch_scene(&id),
                            None => Ok(()),
                        }
                    }
                    _ => Ok(()),
                },
            },
            _ => Ok(()),
        };
        if let Err(e) = result {
            log::warn!("[edit] {}", e);
        }
        self.pump();
    }

    /// New placements get an info hotspot with the `--note` text; existing
    /// hotspots are saved with their current fields.
    fn submit_open_form(&mut self) -> Result<(), pano_core::TourError> {
        let Some(open) = self.session.open_form() else {
            return Ok(());
        };
        let form = match open.target {
            FormTarget::New { .. } => HotspotForm {
                kind: HotspotKind::Info,
                title: self.note.clone(),
                description: Some(self.note.clone()),
                ..HotspotForm::default()
            },
            FormTarget::Existing { .. } => open.form.clone(),
        };
        let edit = self.session.submit_form(form)?;
        log::info!("[edit] {} {}", edit.kind.as_str(), edit.hotspot_id);
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.session.ledger().has_pending() {
            log::warn!("[save] closing with unsaved scenes");
        }
        self.session.shutdown();
        self.renderer.dispose();
    }
}
