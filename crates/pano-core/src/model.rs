use crate::constants::{DEFAULT_ICON_PX, ICON_SIZE_MAX, ICON_SIZE_MIN, SURFACE_EPSILON};
use crate::error::TourError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotKind {
    Info,
    Navigation,
}

/// Icon dimensions in CSS pixels. Each side is clamped to 10..=100.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IconSize {
    pub width: f32,
    pub height: f32,
}

impl IconSize {
    pub fn clamped(width: f32, height: f32) -> Self {
        Self { width, height }.clamp()
    }

    pub fn clamp(self) -> Self {
        let side = |v: f32| {
            if v.is_finite() {
                v.clamp(ICON_SIZE_MIN, ICON_SIZE_MAX)
            } else {
                DEFAULT_ICON_PX
            }
        };
        Self {
            width: side(self.width),
            height: side(self.height),
        }
    }
}

impl Default for IconSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_ICON_PX,
            height: DEFAULT_ICON_PX,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HotspotKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_scene_id: Option<String>,
    #[serde(with = "vec3_xyz")]
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<IconSize>,
}

impl Hotspot {
    /// True when `position` sits on the sphere surface within tolerance.
    pub fn is_on_sphere(&self, center: Vec3, radius: f32) -> bool {
        let d = (self.position - center).length();
        (d - radius).abs() <= radius * SURFACE_EPSILON
    }

    pub fn icon_size_or_default(&self) -> IconSize {
        self.icon_size.map(IconSize::clamp).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    /// A fresh scene for a panorama that was just uploaded.
    pub fn new_from_upload(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            image_url: image_url.into(),
            hotspots: Vec::new(),
        }
    }

    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    pub fn hotspot_mut(&mut self, id: &str) -> Option<&mut Hotspot> {
        self.hotspots.iter_mut().find(|h| h.id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkProblem {
    MissingTarget,
    UnknownTarget(String),
    SelfTarget,
}

/// A navigation hotspot whose target cannot be followed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokenLink {
    pub scene_id: String,
    pub hotspot_id: String,
    pub problem: LinkProblem,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub starting_scene_id: Option<String>,
}

impl Tour {
    pub fn from_json(text: &str) -> Result<Self, TourError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, TourError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn scene_mut(&mut self, id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == id)
    }

    pub fn contains_scene(&self, id: &str) -> bool {
        self.scene(id).is_some()
    }

    /// Starting scene if it resolves, else the first scene, else nothing.
    pub fn starting_scene(&self) -> Option<&Scene> {
        self.starting_scene_id
            .as_deref()
            .and_then(|id| self.scene(id))
            .or_else(|| self.scenes.first())
    }

    pub fn push_scene(&mut self, scene: Scene) -> Result<(), TourError> {
        if self.contains_scene(&scene.id) {
            return Err(TourError::DuplicateScene(scene.id));
        }
        if self.starting_scene_id.is_none() {
            self.starting_scene_id = Some(scene.id.clone());
        }
        self.scenes.push(scene);
        Ok(())
    }

    pub fn rename_scene(&mut self, id: &str, title: impl Into<String>) -> Result<(), TourError> {
        let scene = self
            .scene_mut(id)
            .ok_or_else(|| TourError::UnknownScene(id.to_string()))?;
        scene.title = title.into();
        Ok(())
    }

    /// Removes a scene. Links pointing at it are left in place and show up in
    /// [`Tour::broken_links`].
    pub fn remove_scene(&mut self, id: &str) -> Result<Scene, TourError> {
        let idx = self
            .scenes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| TourError::UnknownScene(id.to_string()))?;
        let removed = self.scenes.remove(idx);
        if self.starting_scene_id.as_deref() == Some(id) {
            self.starting_scene_id = self.scenes.first().map(|s| s.id.clone());
        }
        Ok(removed)
    }

    /// Replace a scene by id, e.g. after an edit round trip.
    pub fn replace_scene(&mut self, scene: Scene) -> Result<(), TourError> {
        let slot = self
            .scene_mut(&scene.id)
            .ok_or_else(|| TourError::UnknownScene(scene.id.clone()))?;
        *slot = scene;
        Ok(())
    }

    /// Walk the tour graph and report navigation hotspots that lead nowhere.
    pub fn broken_links(&self) -> Vec<BrokenLink> {
        let mut out = Vec::new();
        for scene in &self.scenes {
            for h in scene
                .hotspots
                .iter()
                .filter(|h| h.kind == HotspotKind::Navigation)
            {
                let problem = match h.target_scene_id.as_deref() {
                    None | Some("") => Some(LinkProblem::MissingTarget),
                    Some(t) if t == scene.id => Some(LinkProblem::SelfTarget),
                    Some(t) if !self.contains_scene(t) => {
                        Some(LinkProblem::UnknownTarget(t.to_string()))
                    }
                    Some(_) => None,
                };
                if let Some(problem) = problem {
                    out.push(BrokenLink {
                        scene_id: scene.id.clone(),
                        hotspot_id: h.id.clone(),
                        problem,
                    });
                }
            }
        }
        out
    }
}

mod vec3_xyz {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyz {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec3, s: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec3, D::Error> {
        let p = Xyz::deserialize(d)?;
        Ok(Vec3::new(p.x, p.y, p.z))
    }
}
