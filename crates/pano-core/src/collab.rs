use crate::constants::{
    ICON_ALLOWED_TYPES, ICON_MAX_BYTES, ICON_UPLOAD_FOLDER, PANORAMA_ALLOWED_TYPES,
    PANORAMA_MAX_BYTES, PANORAMA_UPLOAD_FOLDER,
};
use crate::error::{CollabError, ValidationError};
use crate::model::{Scene, Tour};
use fnv::FnvHashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConstraints {
    pub folder: String,
    pub allowed_types: Vec<String>,
    pub max_size_bytes: u64,
}

impl UploadConstraints {
    pub fn icons() -> Self {
        Self {
            folder: ICON_UPLOAD_FOLDER.to_string(),
            allowed_types: ICON_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect(),
            max_size_bytes: ICON_MAX_BYTES,
        }
    }

    pub fn panoramas() -> Self {
        Self {
            folder: PANORAMA_UPLOAD_FOLDER.to_string(),
            allowed_types: PANORAMA_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect(),
            max_size_bytes: PANORAMA_MAX_BYTES,
        }
    }

    pub fn check(&self, content_type: &str, size_bytes: u64) -> Result<(), ValidationError> {
        let ct = content_type.trim().to_ascii_lowercase();
        if !self.allowed_types.iter().any(|t| *t == ct) {
            return Err(ValidationError::UnsupportedType(content_type.to_string()));
        }
        if size_bytes > self.max_size_bytes {
            return Err(ValidationError::TooLarge {
                size: size_bytes,
                limit: self.max_size_bytes,
            });
        }
        Ok(())
    }
}

/// A file handed to the upload collaborator.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub trait Uploader {
    /// Store `file` and return a durable URL for it.
    fn upload(
        &mut self,
        file: &UploadFile,
        constraints: &UploadConstraints,
    ) -> Result<String, CollabError>;
}

pub trait TourStore {
    fn save_scene(&mut self, tour_id: &str, scene: &Scene) -> Result<(), CollabError>;
    fn save_tour(&mut self, tour: &Tour) -> Result<(), CollabError>;
}

/// A scene snapshot that must reach the persistence collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveRequest {
    pub tour_id: String,
    pub scene: Scene,
    pub revision: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    Pending(u64),
    Failed(u64),
    Saved(u64),
}

/// Per-scene bookkeeping for optimistic writes. In-memory state is never
/// rolled back; a failed scene stays `Failed` until a later revision of it is
/// confirmed.
#[derive(Debug, Default)]
pub struct SaveLedger {
    next_revision: u64,
    scenes: FnvHashMap<String, SaveStatus>,
}

impl SaveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, tour_id: &str, scene: &Scene) -> SaveRequest {
        self.next_revision += 1;
        let revision = self.next_revision;
        self.scenes
            .insert(scene.id.clone(), SaveStatus::Pending(revision));
        SaveRequest {
            tour_id: tour_id.to_string(),
            scene: scene.clone(),
            revision,
        }
    }

    /// Record a collaborator response. Responses for revisions older than the
    /// latest issued one for the scene do not change its status.
    pub fn resolve(&mut self, scene_id: &str, revision: u64, ok: bool) {
        let Some(status) = self.scenes.get_mut(scene_id) else {
            return;
        };
        let latest = match *status {
            SaveStatus::Pending(r) | SaveStatus::Failed(r) | SaveStatus::Saved(r) => r,
        };
        if revision < latest {
            log::debug!("[save] ignoring outdated response r{} for {}", revision, scene_id);
            return;
        }
        *status = if ok {
            SaveStatus::Saved(revision)
        } else {
            log::warn!("[save] scene {} r{} failed; in-memory edit kept", scene_id, revision);
            SaveStatus::Failed(revision)
        };
    }

    pub fn status(&self, scene_id: &str) -> Option<SaveStatus> {
        self.scenes.get(scene_id).copied()
    }

    pub fn failed(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .scenes
            .iter()
            .filter(|(_, s)| matches!(s, SaveStatus::Failed(_)))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn has_pending(&self) -> bool {
        self.scenes
            .values()
            .any(|s| matches!(s, SaveStatus::Pending(_)))
    }
}
