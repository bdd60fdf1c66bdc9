use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    Local(PathBuf),
    Remote(String),
}

pub fn resolve_asset(base_dir: &Path, url: &str) -> AssetSource {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
        return AssetSource::Remote(url.to_string());
    }
    let path = url.strip_prefix("file://").unwrap_or(url);
    let path = Path::new(path);
    if path.is_absolute() {
        AssetSource::Local(path.to_path_buf())
    } else {
        AssetSource::Local(base_dir.join(path))
    }
}

pub fn read_asset(base_dir: &Path, url: &str) -> anyhow::Result<Vec<u8>> {
    match resolve_asset(base_dir, url) {
        AssetSource::Local(path) => {
            std::fs::read(&path).with_context(|| format!("reading {}", path.display()))
        }
        AssetSource::Remote(url) => {
            anyhow::bail!("remote asset {} is not fetched by the previewer", url)
        }
    }
}

/// MIME type from the file extension, for upload constraint checks.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => return None,
    })
}
