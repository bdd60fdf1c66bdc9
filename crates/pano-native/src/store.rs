use pano_core::{CollabError, Scene, Tour, TourStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Persists a tour as a single pretty-printed JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative asset URLs are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn load(&self) -> Result<Tour, CollabError> {
        let text = fs::read_to_string(&self.path)?;
        Tour::from_json(&text).map_err(|e| CollabError::Storage(e.to_string()))
    }

    /// Load the tour, or start an empty one if the file does not exist yet.
    pub fn load_or_create(&self, title: &str) -> Result<Tour, CollabError> {
        if self.path.exists() {
            return self.load();
        }
        log::info!("[save] creating new tour at {}", self.path.display());
        Ok(Tour {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            scenes: Vec::new(),
            starting_scene_id: None,
        })
    }

    fn write(&self, tour: &Tour) -> Result<(), CollabError> {
        let text = serde_json::to_string_pretty(tour)?;
        // write-then-rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TourStore for JsonFileStore {
    fn save_scene(&mut self, tour_id: &str, scene: &Scene) -> Result<(), CollabError> {
        let mut tour = self.load()?;
        if tour.id != tour_id {
            return Err(CollabError::Storage(format!(
                "{} holds tour {}, not {}",
                self.path.display(),
                tour.id,
                tour_id
            )));
        }
        tour.replace_scene(scene.clone())
            .map_err(|e| CollabError::Storage(e.to_string()))?;
        self.write(&tour)
    }

    fn save_tour(&mut self, tour: &Tour) -> Result<(), CollabError> {
        self.write(tour)
    }
}
