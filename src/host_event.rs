use pano_core::{FormTarget, HotspotForm, Mode, SessionEvent};
use serde::Serialize;

/// Notifications delivered to the host page's `onEvent` callback, as
/// `{ "type": "...", ... }` objects.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    #[serde(rename_all = "camelCase")]
    SceneChanged { scene_id: String, image_url: String },
    #[serde(rename_all = "camelCase")]
    HotspotsChanged { scene_id: String },
    #[serde(rename_all = "camelCase")]
    ShowInfo {
        hotspot_id: String,
        title: String,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    FormOpened {
        scene_id: String,
        /// `None` when placing a new hotspot.
        hotspot_id: Option<String>,
        position: Option<[f32; 3]>,
        form: HotspotForm,
    },
    FormClosed,
    ModeChanged { mode: Mode },
    TransitionStarted { target: String },
    #[serde(rename_all = "camelCase")]
    TransitionFinished { scene_id: String },
    TransitionCancelled { target: String },
    /// Emitted instead of calling persistence when the host registered none.
    #[serde(rename_all = "camelCase")]
    SaveRequested {
        tour_id: String,
        scene_id: String,
        revision: u64,
        scene_json: String,
    },
    #[serde(rename_all = "camelCase")]
    SaveFailed {
        scene_id: String,
        revision: u64,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    PanoramaFailed {
        scene_id: String,
        url: String,
        message: String,
    },
}

impl HostEvent {
    /// Host-facing form of a session event. `SaveRequested` maps only when no
    /// persistence callback is installed, so callers handle it themselves.
    pub fn from_session(ev: &SessionEvent) -> Option<HostEvent> {
        Some(match ev {
            SessionEvent::SceneChanged {
                scene_id,
                image_url,
            } => HostEvent::SceneChanged {
                scene_id: scene_id.clone(),
                image_url: image_url.clone(),
            },
            SessionEvent::HotspotsChanged { scene_id } => HostEvent::HotspotsChanged {
                scene_id: scene_id.clone(),
            },
            SessionEvent::ShowInfo(info) => HostEvent::ShowInfo {
                hotspot_id: info.hotspot_id.clone(),
                title: info.title.clone(),
                description: info.description.clone(),
            },
            SessionEvent::FormOpened(open) => {
                let (hotspot_id, position) = match &open.target {
                    FormTarget::New { position } => (None, Some(position.to_array())),
                    FormTarget::Existing { hotspot_id } => (Some(hotspot_id.clone()), None),
                };
                HostEvent::FormOpened {
                    scene_id: open.scene_id.clone(),
                    hotspot_id,
                    position,
                    form: open.form.clone(),
                }
            }
            SessionEvent::FormClosed => HostEvent::FormClosed,
            SessionEvent::ModeChanged(mode) => HostEvent::ModeChanged { mode: *mode },
            SessionEvent::TransitionStarted { target } => HostEvent::TransitionStarted {
                target: target.clone(),
            },
            SessionEvent::TransitionFinished { scene_id } => HostEvent::TransitionFinished {
                scene_id: scene_id.clone(),
            },
            SessionEvent::TransitionCancelled { target } => HostEvent::TransitionCancelled {
                target: target.clone(),
            },
            SessionEvent::SaveRequested(_) => return None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
