use crate::collab::UploadConstraints;
use crate::error::{TourError, ValidationError};
use crate::model::{Hotspot, HotspotKind, IconSize, Scene, Tour};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Authoring form fields as exchanged with the host page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotspotForm {
    #[serde(rename = "type")]
    pub kind: HotspotKind,
    pub title: String,
    pub description: Option<String>,
    pub target_scene_id: Option<String>,
    pub icon_url: Option<String>,
    pub icon_size: Option<IconSize>,
    /// Upload metadata for a freshly chosen icon, when the host has it.
    pub icon_content_type: Option<String>,
    pub icon_byte_size: Option<u64>,
}

impl Default for HotspotForm {
    fn default() -> Self {
        Self {
            kind: HotspotKind::Info,
            title: String::new(),
            description: None,
            target_scene_id: None,
            icon_url: None,
            icon_size: None,
            icon_content_type: None,
            icon_byte_size: None,
        }
    }
}

impl HotspotForm {
    pub fn from_hotspot(h: &Hotspot) -> Self {
        Self {
            kind: h.kind,
            title: h.title.clone(),
            description: h.description.clone(),
            target_scene_id: h.target_scene_id.clone(),
            icon_url: h.icon_url.clone(),
            icon_size: h.icon_size,
            icon_content_type: None,
            icon_byte_size: None,
        }
    }

    fn description_text(&self) -> &str {
        self.description.as_deref().map(str::trim).unwrap_or("")
    }

    fn target_text(&self) -> &str {
        self.target_scene_id.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Check a submitted form against the tour. `scene_id` is the scene the
/// hotspot lives in.
pub fn validate(
    form: &HotspotForm,
    scene_id: &str,
    tour: &Tour,
    icon_rules: &UploadConstraints,
) -> Result<(), ValidationError> {
    if form.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    match form.kind {
        HotspotKind::Info => {
            if form.description_text().is_empty() {
                return Err(ValidationError::MissingDescription);
            }
        }
        HotspotKind::Navigation => {
            let target = form.target_text();
            if target.is_empty() {
                return Err(ValidationError::MissingTarget);
            }
            if target == scene_id {
                return Err(ValidationError::SelfTarget);
            }
            if !tour.contains_scene(target) {
                return Err(ValidationError::UnknownTarget(target.to_string()));
            }
        }
    }
    if let Some(ct) = form.icon_content_type.as_deref() {
        icon_rules.check(ct, form.icon_byte_size.unwrap_or(0))?;
    } else if let Some(size) = form.icon_byte_size {
        if size > icon_rules.max_size_bytes {
            return Err(ValidationError::TooLarge {
                size,
                limit: icon_rules.max_size_bytes,
            });
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormTarget {
    New { position: Vec3 },
    Existing { hotspot_id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct OpenForm {
    pub scene_id: String,
    pub target: FormTarget,
    pub form: HotspotForm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Created,
    Updated,
    Removed,
}

impl EditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EditKind::Created => "created",
            EditKind::Updated => "updated",
            EditKind::Removed => "removed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneEdit {
    pub scene_id: String,
    pub hotspot_id: String,
    pub kind: EditKind,
}

#[derive(Debug)]
pub struct EditController {
    enabled: bool,
    open: Option<OpenForm>,
    icon_rules: UploadConstraints,
}

impl EditController {
    pub fn new() -> Self {
        Self {
            enabled: false,
            open: None,
            icon_rules: UploadConstraints::icons(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling also drops any half-filled form.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.open = None;
        }
    }

    pub fn open_form(&self) -> Option<&OpenForm> {
        self.open.as_ref()
    }

    pub fn place(&mut self, scene_id: &str, point: Vec3) -> Result<&OpenForm, TourError> {
        self.ensure_enabled()?;
        log::info!(
            "[edit] placing hotspot in {} at ({:.1},{:.1},{:.1})",
            scene_id,
            point.x,
            point.y,
            point.z
        );
        Ok(&*self.open.insert(OpenForm {
            scene_id: scene_id.to_string(),
            target: FormTarget::New { position: point },
            form: HotspotForm::default(),
        }))
    }

    pub fn edit(&mut self, scene_id: &str, hotspot: &Hotspot) -> Result<&OpenForm, TourError> {
        self.ensure_enabled()?;
        Ok(&*self.open.insert(OpenForm {
            scene_id: scene_id.to_string(),
            target: FormTarget::Existing {
                hotspot_id: hotspot.id.clone(),
            },
            form: HotspotForm::from_hotspot(hotspot),
        }))
    }

    pub fn cancel(&mut self) -> Option<OpenForm> {
        self.open.take()
    }

    /// Validate and apply the submitted form to the scene it was opened for.
    /// On error nothing is mutated and the form stays open.
    pub fn submit(&mut self, form: HotspotForm, tour: &mut Tour) -> Result<SceneEdit, TourError> {
        self.ensure_enabled()?;
        let open = self.open.as_ref().ok_or(TourError::NoOpenForm)?;
        validate(&form, &open.scene_id, tour, &self.icon_rules)?;
        let scene = tour
            .scene_mut(&open.scene_id)
            .ok_or_else(|| TourError::UnknownScene(open.scene_id.clone()))?;
        let edit = match &open.target {
            FormTarget::New { position } => {
                let hotspot = build_hotspot(uuid::Uuid::new_v4().to_string(), *position, form);
                let id = hotspot.id.clone();
                scene.hotspots.push(hotspot);
                SceneEdit {
                    scene_id: scene.id.clone(),
                    hotspot_id: id,
                    kind: EditKind::Created,
                }
            }
            FormTarget::Existing { hotspot_id } => {
                let existing = scene
                    .hotspot_mut(hotspot_id)
                    .ok_or_else(|| TourError::UnknownHotspot(hotspot_id.clone()))?;
                *existing = build_hotspot(existing.id.clone(), existing.position, form);
                SceneEdit {
                    scene_id: scene.id.clone(),
                    hotspot_id: hotspot_id.clone(),
                    kind: EditKind::Updated,
                }
            }
        };
        self.open = None;
        log::info!("[edit] {:?} hotspot {} in {}", edit.kind, edit.hotspot_id, edit.scene_id);
        Ok(edit)
    }

    pub fn remove(&mut self, scene: &mut Scene, hotspot_id: &str) -> Result<SceneEdit, TourError> {
        self.ensure_enabled()?;
        let before = scene.hotspots.len();
        scene.hotspots.retain(|h| h.id != hotspot_id);
        if scene.hotspots.len() == before {
            return Err(TourError::UnknownHotspot(hotspot_id.to_string()));
        }
        if matches!(
            &self.open,
            Some(OpenForm { target: FormTarget::Existing { hotspot_id: id }, .. }) if id == hotspot_id
        ) {
            self.open = None;
        }
        log::info!("[edit] removed hotspot {} from {}", hotspot_id, scene.id);
        Ok(SceneEdit {
            scene_id: scene.id.clone(),
            hotspot_id: hotspot_id.to_string(),
            kind: EditKind::Removed,
        })
    }

    fn ensure_enabled(&self) -> Result<(), TourError> {
        if self.enabled {
            Ok(())
        } else {
            Err(TourError::EditDisabled)
        }
    }
}

impl Default for EditController {
    fn default() -> Self {
        Self::new()
    }
}

fn build_hotspot(id: String, position: Vec3, form: HotspotForm) -> Hotspot {
    let (description, target_scene_id) = match form.kind {
        HotspotKind::Info => (Some(form.description_text().to_string()), None),
        HotspotKind::Navigation => (None, Some(form.target_text().to_string())),
    };
    let icon_url = form.icon_url.filter(|u| !u.trim().is_empty());
    let icon_size = icon_url
        .as_ref()
        .and(form.icon_size)
        .map(IconSize::clamp);
    Hotspot {
        id,
        kind: form.kind,
        title: form.title.trim().to_string(),
        description,
        target_scene_id,
        position,
        icon_url,
        icon_size,
    }
}
