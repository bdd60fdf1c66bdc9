use pano_core::{CollabError, UploadConstraints, UploadFile, Uploader};
use std::fs;
use std::path::PathBuf;

/// Copies uploads into `<root>/<folder>/` and hands back the path relative to
/// `root`, which is how the tour file refers to them.
#[derive(Clone, Debug)]
pub struct LocalUploader {
    root: PathBuf,
}

impl LocalUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

impl Uploader for LocalUploader {
    fn upload(
        &mut self,
        file: &UploadFile,
        constraints: &UploadConstraints,
    ) -> Result<String, CollabError> {
        constraints
            .check(&file.content_type, file.bytes.len() as u64)
            .map_err(|e| CollabError::Rejected(e.to_string()))?;
        let dir = self.root.join(&constraints.folder);
        fs::create_dir_all(&dir)?;
        let short_id = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("{}-{}", &short_id[..8], sanitize_file_name(&file.name));
        fs::write(dir.join(&name), &file.bytes)?;
        let url = format!("{}/{}", constraints.folder, name);
        log::info!("[upload] {} -> {}", file.name, url);
        Ok(url)
    }
}
