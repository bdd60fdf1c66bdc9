use thiserror::Error;

/// Authoring-form rejections. Raised before any entity is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("info hotspots need a description")]
    MissingDescription,
    #[error("navigation hotspots need a target scene")]
    MissingTarget,
    #[error("target scene `{0}` does not exist")]
    UnknownTarget(String),
    #[error("a hotspot cannot link to its own scene")]
    SelfTarget,
    #[error("file type `{0}` is not allowed")]
    UnsupportedType(String),
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Error)]
pub enum TourError {
    #[error("scene `{0}` not found")]
    UnknownScene(String),
    #[error("hotspot `{0}` not found in the current scene")]
    UnknownHotspot(String),
    #[error("scene id `{0}` already exists")]
    DuplicateScene(String),
    #[error("no current scene")]
    NoCurrentScene,
    #[error("editing is disabled in view mode")]
    EditDisabled,
    #[error("no hotspot form is open")]
    NoOpenForm,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("tour document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures reported by the upload and persistence collaborators.
#[derive(Debug, Error)]
pub enum CollabError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
