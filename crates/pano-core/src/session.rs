//! The tour session: one live viewer's state and every operation the
//! frontends drive.
//!
//! Frontends own a `TourSession`, feed it rays and frame deltas, and drain
//! [`SessionEvent`]s to update the renderer, the host UI and persistence.

use crate::collab::{SaveLedger, SaveRequest};
use crate::config::ViewerConfig;
use crate::constants::sphere_center_vec3;
use crate::edit::{EditController, FormTarget, HotspotForm, OpenForm, SceneEdit};
use crate::error::TourError;
use crate::loader::{LoadTicket, LoadTracker};
use crate::markers::MarkerSet;
use crate::model::{Hotspot, HotspotKind, Scene, Tour};
use crate::navigation::{FadeTimings, NavEvent, NavState, NavigateOutcome, Navigator};
use crate::picking::{strategy_for, Mode, PanoramaSphere, PickResult, PickStrategy, PickTargets, Ray, ViewPick};
use glam::Vec3;
use serde::Serialize;
use std::collections::VecDeque;

/// What an info hotspot shows when activated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPayload {
    pub hotspot_id: String,
    pub title: String,
    pub description: String,
}

/// Result of a click/tap on the viewport.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    /// Nothing under the pointer.
    None,
    ShowInfo(InfoPayload),
    Navigating(String),
    /// A transition is already running.
    NavigationIgnored,
    /// Navigation hotspot whose target is missing or unknown.
    BrokenLink(Option<String>),
    FormOpened,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SceneChanged { scene_id: String, image_url: String },
    HotspotsChanged { scene_id: String },
    ShowInfo(InfoPayload),
    FormOpened(OpenForm),
    FormClosed,
    ModeChanged(Mode),
    TransitionStarted { target: String },
    TransitionFinished { scene_id: String },
    TransitionCancelled { target: String },
    SaveRequested(SaveRequest),
}

pub struct TourSession {
    tour: Tour,
    current: Option<String>,
    mode: Mode,
    config: ViewerConfig,
    sphere: PanoramaSphere,
    navigator: Navigator,
    markers: MarkerSet,
    editor: EditController,
    loads: LoadTracker,
    ledger: SaveLedger,
    events: VecDeque<SessionEvent>,
}

impl TourSession {
    pub fn new(tour: Tour, config: ViewerConfig) -> Self {
        let mut session = Self {
            sphere: PanoramaSphere {
                center: sphere_center_vec3(),
                radius: config.sphere_radius,
            },
            navigator: Navigator::new(FadeTimings::from(&config)),
            markers: MarkerSet::new(&config),
            editor: EditController::new(),
            loads: LoadTracker::new(),
            ledger: SaveLedger::new(),
            events: VecDeque::new(),
            current: None,
            mode: Mode::View,
            config,
            tour,
        };
        match session.tour.starting_scene().map(|s| s.id.clone()) {
            Some(id) => session.set_current(&id),
            None => log::warn!("[session] tour {} has no scenes", session.tour.id),
        }
        session
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn current_scene_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current.as_deref().and_then(|id| self.tour.scene(id))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sphere(&self) -> PanoramaSphere {
        self.sphere
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Per-frame billboarding pass.
    pub fn billboard_markers(&mut self, eye: Vec3) {
        self.markers.billboard(eye);
    }

    pub fn nav_state(&self) -> NavState {
        self.navigator.state()
    }

    pub fn opacity(&self) -> f32 {
        self.navigator.opacity()
    }

    pub fn open_form(&self) -> Option<&OpenForm> {
        self.editor.open_form()
    }

    pub fn ledger(&self) -> &SaveLedger {
        &self.ledger
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    // ---------------- scene selection ----------------

    /// Direct jump (scene list). No fade; unknown ids are rejected and leave
    /// the current scene untouched.
    pub fn switch_scene(&mut self, id: &str) -> Result<(), TourError> {
        if !self.tour.contains_scene(id) {
            log::error!("[session] switch_scene: unknown scene {}", id);
            return Err(TourError::UnknownScene(id.to_string()));
        }
        if let Some(NavEvent::Cancelled(target)) = self.navigator.cancel() {
            self.events
                .push_back(SessionEvent::TransitionCancelled { target });
        }
        self.set_current(id);
        Ok(())
    }

    /// Animated navigation (hotspot activation).
    pub fn navigate(&mut self, id: &str) -> Result<NavigateOutcome, TourError> {
        let outcome = self.navigator.navigate(id, &self.tour)?;
        if outcome == NavigateOutcome::Started {
            self.events.push_back(SessionEvent::TransitionStarted {
                target: id.to_string(),
            });
        }
        Ok(outcome)
    }

    /// Advance animations; applies the scene swap when the fade-out completes.
    pub fn tick(&mut self, dt_sec: f32) {
        let Some(ev) = self.navigator.tick(dt_sec) else {
            return;
        };
        match ev {
            NavEvent::SwapScene(target) => {
                if self.tour.contains_scene(&target) {
                    self.set_current(&target);
                } else {
                    log::error!("[nav] scene {} vanished mid-transition", target);
                    if let Some(NavEvent::Cancelled(target)) = self.navigator.cancel() {
                        self.events
                            .push_back(SessionEvent::TransitionCancelled { target });
                    }
                }
            }
            NavEvent::Finished(scene_id) => {
                self.events
                    .push_back(SessionEvent::TransitionFinished { scene_id });
            }
            NavEvent::Cancelled(target) => {
                self.events
                    .push_back(SessionEvent::TransitionCancelled { target });
            }
        }
    }

    pub fn cancel_transition(&mut self) -> bool {
        match self.navigator.cancel() {
            Some(NavEvent::Cancelled(target)) => {
                self.events
                    .push_back(SessionEvent::TransitionCancelled { target });
                true
            }
            _ => false,
        }
    }

    fn set_current(&mut self, id: &str) {
        let Some(scene) = self.tour.scene(id) else {
            return;
        };
        self.markers.rebuild(scene);
        let image_url = scene.image_url.clone();
        if matches!(self.editor.open_form(), Some(f) if f.scene_id != id) {
            self.editor.cancel();
            self.events.push_back(SessionEvent::FormClosed);
        }
        self.current = Some(id.to_string());
        log::info!("[session] current scene -> {}", id);
        self.events.push_back(SessionEvent::SceneChanged {
            scene_id: id.to_string(),
            image_url,
        });
    }

    // ---------------- mode & picking ----------------

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        let had_form = self.editor.open_form().is_some();
        self.mode = mode;
        self.editor.set_enabled(mode == Mode::Edit);
        if had_form && self.editor.open_form().is_none() {
            self.events.push_back(SessionEvent::FormClosed);
        }
        log::info!("[session] mode -> {:?}", mode);
        self.events.push_back(SessionEvent::ModeChanged(mode));
    }

    fn targets(&self) -> PickTargets<'_> {
        PickTargets {
            sphere: self.sphere,
            markers: &self.markers,
        }
    }

    /// Ray-pick with the strategy of the current mode.
    pub fn pick(&self, ray: &Ray) -> Option<PickResult> {
        self.current.as_ref()?;
        strategy_for(self.mode).pick(ray, &self.targets())
    }

    /// Hotspot under the pointer in view mode, for cursor feedback.
    pub fn hover(&self, ray: &Ray) -> Option<&Hotspot> {
        if self.mode != Mode::View {
            return None;
        }
        let scene = self.current_scene()?;
        match ViewPick.pick(ray, &self.targets())? {
            PickResult::Hotspot(id) => scene.hotspot(&id),
            PickResult::Surface(_) => None,
        }
    }

    /// Dispatch a click/tap.
    pub fn activate(&mut self, ray: &Ray) -> Result<Interaction, TourError> {
        let Some(scene_id) = self.current.clone() else {
            return Ok(Interaction::None);
        };
        let Some(hit) = self.pick(ray) else {
            log::trace!("[pick] miss");
            return Ok(Interaction::None);
        };
        match hit {
            PickResult::Surface(point) => {
                let open = self.editor.place(&scene_id, point)?.clone();
                self.events.push_back(SessionEvent::FormOpened(open));
                Ok(Interaction::FormOpened)
            }
            PickResult::Hotspot(hotspot_id) => {
                let hotspot = self
                    .tour
                    .scene(&scene_id)
                    .and_then(|s| s.hotspot(&hotspot_id))
                    .ok_or_else(|| TourError::UnknownHotspot(hotspot_id.clone()))?;
                match hotspot.kind {
                    HotspotKind::Info => {
                        let payload = InfoPayload {
                            hotspot_id: hotspot.id.clone(),
                            title: hotspot.title.clone(),
                            description: hotspot.description.clone().unwrap_or_default(),
                        };
                        self.events
                            .push_back(SessionEvent::ShowInfo(payload.clone()));
                        Ok(Interaction::ShowInfo(payload))
                    }
                    HotspotKind::Navigation => {
                        let target = hotspot
                            .target_scene_id
                            .clone()
                            .filter(|t| !t.is_empty());
                        let Some(target) = target else {
                            log::error!("[nav] hotspot {} has no target scene", hotspot_id);
                            return Ok(Interaction::BrokenLink(None));
                        };
                        match self.navigate(&target) {
                            Ok(NavigateOutcome::Started) => Ok(Interaction::Navigating(target)),
                            Ok(NavigateOutcome::Ignored) => Ok(Interaction::NavigationIgnored),
                            Err(TourError::UnknownScene(_)) => {
                                Ok(Interaction::BrokenLink(Some(target)))
                            }
                            Err(e) => Err(e),
                        }
                    }
                }
            }
        }
    }

    // ---------------- authoring ----------------

    /// Open the form pre-filled with an existing hotspot of the current scene.
    pub fn edit_hotspot(&mut self, hotspot_id: &str) -> Result<(), TourError> {
        let scene = self.current_scene().ok_or(TourError::NoCurrentScene)?;
        let hotspot = scene
            .hotspot(hotspot_id)
            .ok_or_else(|| TourError::UnknownHotspot(hotspot_id.to_string()))?
            .clone();
        let scene_id = scene.id.clone();
        let open = self.editor.edit(&scene_id, &hotspot)?.clone();
        self.events.push_back(SessionEvent::FormOpened(open));
        Ok(())
    }

    pub fn submit_form(&mut self, form: HotspotForm) -> Result<SceneEdit, TourError> {
        let edit = self.editor.submit(form, &mut self.tour)?;
        self.events.push_back(SessionEvent::FormClosed);
        self.after_edit(&edit);
        Ok(edit)
    }

    pub fn cancel_form(&mut self) -> bool {
        let closed = self.editor.cancel().is_some();
        if closed {
            self.events.push_back(SessionEvent::FormClosed);
        }
        closed
    }

    pub fn remove_hotspot(&mut self, hotspot_id: &str) -> Result<SceneEdit, TourError> {
        let scene_id = self.current.clone().ok_or(TourError::NoCurrentScene)?;
        let form_was_for_it = matches!(
            self.editor.open_form(),
            Some(OpenForm { target: FormTarget::Existing { hotspot_id: id }, .. }) if id == hotspot_id
        );
        let scene = self
            .tour
            .scene_mut(&scene_id)
            .ok_or_else(|| TourError::UnknownScene(scene_id.clone()))?;
        let edit = self.editor.remove(scene, hotspot_id)?;
        if form_was_for_it {
            self.events.push_back(SessionEvent::FormClosed);
        }
        self.after_edit(&edit);
        Ok(edit)
    }

    /// Optimistic write-back: the in-memory tour already changed, now rebuild
    /// markers and hand the scene to persistence.
    fn after_edit(&mut self, edit: &SceneEdit) {
        let Some(scene) = self.tour.scene(&edit.scene_id) else {
            return;
        };
        if self.current.as_deref() == Some(edit.scene_id.as_str()) {
            self.markers.rebuild(scene);
            self.events.push_back(SessionEvent::HotspotsChanged {
                scene_id: edit.scene_id.clone(),
            });
        }
        let req = self.ledger.issue(&self.tour.id, scene);
        log::debug!(
            "[save] {} {} -> scene {} r{}",
            edit.kind.as_str(),
            edit.hotspot_id,
            scene.id,
            req.revision
        );
        self.events.push_back(SessionEvent::SaveRequested(req));
    }

    // ---------------- collaborators ----------------

    pub fn resolve_save(&mut self, scene_id: &str, revision: u64, ok: bool) {
        self.ledger.resolve(scene_id, revision, ok);
    }

    /// Re-emit the current in-memory copy of every scene whose last save
    /// failed. Returns how many saves were queued.
    pub fn retry_failed_saves(&mut self) -> usize {
        let mut queued = 0;
        for id in self.ledger.failed() {
            if let Some(scene) = self.tour.scene(&id) {
                let req = self.ledger.issue(&self.tour.id, scene);
                self.events.push_back(SessionEvent::SaveRequested(req));
                queued += 1;
            }
        }
        queued
    }

    /// Ticket for loading the current scene's panorama.
    pub fn begin_panorama_load(&mut self) -> Option<LoadTicket> {
        let scene = self.current.as_deref().and_then(|id| self.tour.scene(id))?;
        Some(self.loads.begin(&scene.id, &scene.image_url))
    }

    /// True if a finished load may replace the displayed panorama.
    pub fn accept_panorama(&mut self, ticket: &LoadTicket) -> bool {
        self.loads.complete(ticket)
    }

    pub fn is_load_current(&self, ticket: &LoadTicket) -> bool {
        self.loads.is_current(ticket)
    }

    /// Stop accepting loads, cancel animations and close the editor.
    pub fn shutdown(&mut self) {
        self.loads.shut_down();
        self.navigator.cancel();
        self.editor.set_enabled(false);
        self.events.clear();
    }
}
