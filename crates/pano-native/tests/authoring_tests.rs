// File-backed collaborators, asset resolution and tour checks.

use pano_core::*;
use pano_native::cli::ConfigArgs;
use pano_native::*;
use std::path::{Path, PathBuf};

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("pano-native-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        TempDir(dir)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        _ = std::fs::remove_dir_all(&self.0);
    }
}

fn scene(id: &str, hotspots: Vec<Hotspot>) -> Scene {
    Scene {
        id: id.to_string(),
        title: id.to_uppercase(),
        image_url: format!("panoramas/{id}.jpg"),
        hotspots,
    }
}

fn nav(id: &str, target: Option<&str>, position: glam::Vec3) -> Hotspot {
    Hotspot {
        id: id.to_string(),
        kind: HotspotKind::Navigation,
        title: format!("go {id}"),
        description: None,
        target_scene_id: target.map(str::to_string),
        position,
        icon_url: None,
        icon_size: None,
    }
}

fn tour(scenes: Vec<Scene>) -> Tour {
    Tour {
        id: "t1".to_string(),
        title: "House".to_string(),
        starting_scene_id: scenes.first().map(|s| s.id.clone()),
        scenes,
    }
}

#[test]
fn store_writes_and_reads_back_the_tour() {
    let dir = TempDir::new();
    let mut store = JsonFileStore::new(dir.path().join("tour.json"));
    let t = tour(vec![scene("a", vec![]), scene("b", vec![])]);
    store.save_tour(&t).unwrap();
    assert_eq!(store.load().unwrap(), t);
    assert_eq!(store.base_dir(), dir.path());
}

#[test]
fn save_scene_replaces_only_that_scene() {
    let dir = TempDir::new();
    let mut store = JsonFileStore::new(dir.path().join("tour.json"));
    store
        .save_tour(&tour(vec![scene("a", vec![]), scene("b", vec![])]))
        .unwrap();

    let mut edited = scene("b", vec![]);
    edited.title = "Bedroom".to_string();
    store.save_scene("t1", &edited).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.scene("b").unwrap().title, "Bedroom");
    assert_eq!(loaded.scene("a").unwrap().title, "A");
}

#[test]
fn save_scene_refuses_another_tour() {
    let dir = TempDir::new();
    let mut store = JsonFileStore::new(dir.path().join("tour.json"));
    store.save_tour(&tour(vec![scene("a", vec![])])).unwrap();
    let err = store.save_scene("other", &scene("a", vec![])).unwrap_err();
    assert!(matches!(err, CollabError::Storage(_)));
}

#[test]
fn load_or_create_starts_empty_tour() {
    let dir = TempDir::new();
    let store = JsonFileStore::new(dir.path().join("new.json"));
    let t = store.load_or_create("New").unwrap();
    assert_eq!(t.title, "New");
    assert!(t.scenes.is_empty());
    assert!(!t.id.is_empty());
}

#[test]
fn uploader_copies_into_folder_and_returns_relative_url() {
    let dir = TempDir::new();
    let mut up = LocalUploader::new(dir.path());
    let file = UploadFile {
        name: "my room.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![1, 2, 3],
    };
    let url = up.upload(&file, &UploadConstraints::panoramas()).unwrap();
    assert!(url.starts_with("panoramas/"));
    assert!(url.ends_with("my_room.jpg"));
    assert_eq!(std::fs::read(dir.path().join(&url)).unwrap(), vec![1, 2, 3]);
}

#[test]
fn uploader_rejects_disallowed_type_and_size() {
    let dir = TempDir::new();
    let mut up = LocalUploader::new(dir.path());
    let svg = UploadFile {
        name: "p.svg".to_string(),
        content_type: "image/svg+xml".to_string(),
        bytes: vec![0],
    };
    assert!(matches!(
        up.upload(&svg, &UploadConstraints::panoramas()),
        Err(CollabError::Rejected(_))
    ));

    let big = UploadFile {
        name: "i.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0; (constants::ICON_MAX_BYTES + 1) as usize],
    };
    assert!(matches!(
        up.upload(&big, &UploadConstraints::icons()),
        Err(CollabError::Rejected(_))
    ));
    assert!(!dir.path().join(constants::ICON_UPLOAD_FOLDER).exists());
}

#[test]
fn relative_urls_resolve_against_tour_dir() {
    let base = Path::new("/tours/house");
    assert_eq!(
        resolve_asset(base, "panoramas/a.jpg"),
        AssetSource::Local(PathBuf::from("/tours/house/panoramas/a.jpg"))
    );
    assert_eq!(
        resolve_asset(base, "https://cdn.test/a.jpg"),
        AssetSource::Remote("https://cdn.test/a.jpg".to_string())
    );
}

#[test]
fn remote_assets_are_not_read() {
    assert!(read_asset(Path::new("."), "https://cdn.test/a.jpg").is_err());
}

#[test]
fn content_types_by_extension() {
    assert_eq!(content_type_for(Path::new("x.JPG")), Some("image/jpeg"));
    assert_eq!(content_type_for(Path::new("x.webp")), Some("image/webp"));
    assert_eq!(content_type_for(Path::new("x.tiff")), None);
    assert_eq!(content_type_for(Path::new("noext")), None);
}

#[test]
fn check_reports_broken_links_as_errors() {
    let dir = TempDir::new();
    let r = ViewerConfig::default().sphere_radius;
    let t = tour(vec![
        scene(
            "a",
            vec![
                nav("ok", Some("b"), glam::Vec3::new(0.0, 0.0, -r)),
                nav("dangling", Some("zzz"), glam::Vec3::new(r, 0.0, 0.0)),
                nav("empty", None, glam::Vec3::new(-r, 0.0, 0.0)),
            ],
        ),
        scene("b", vec![]),
    ]);
    let findings = check_tour(&t, &ViewerConfig::default(), dir.path());
    let errors: Vec<_> = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|f| f.scene_id.as_deref() == Some("a")));
    assert!(errors.iter().any(|f| f.message.contains("zzz")));
}

#[test]
fn check_warns_about_off_sphere_hotspots_and_missing_images() {
    let dir = TempDir::new();
    let t = tour(vec![
        scene("a", vec![nav("far", Some("b"), glam::Vec3::new(0.0, 0.0, -10.0))]),
        scene("b", vec![]),
    ]);
    let findings = check_tour(&t, &ViewerConfig::default(), dir.path());
    assert!(findings.iter().all(|f| f.severity == Severity::Warning));
    assert!(findings.iter().any(|f| f.message.contains("far")));
    // neither panorama file exists in the temp dir
    assert_eq!(
        findings
            .iter()
            .filter(|f| f.message.contains("not found"))
            .count(),
        2
    );
}

#[test]
fn check_flags_unresolved_starting_scene() {
    let mut t = tour(vec![scene("a", vec![])]);
    t.starting_scene_id = Some("gone".to_string());
    let findings = check_tour(&t, &ViewerConfig::default(), Path::new("."));
    assert!(findings
        .iter()
        .any(|f| f.severity == Severity::Error && f.message.contains("gone")));
    assert!(findings[0].to_string().starts_with("error"));
}

#[test]
fn cli_overrides_apply_on_top_of_defaults() {
    let args = ConfigArgs {
        fov: Some(90.0),
        fade_in: Some(1.0),
        ..ConfigArgs::default()
    };
    let c = args.resolve().unwrap();
    assert_eq!(c.fov_deg, 90.0);
    assert_eq!(c.fade_in_sec, 1.0);
    assert_eq!(c.fade_out_sec, ViewerConfig::default().fade_out_sec);
}

#[test]
fn cli_out_of_range_values_fall_back() {
    let args = ConfigArgs {
        fov: Some(400.0),
        ..ConfigArgs::default()
    };
    assert_eq!(args.resolve().unwrap().fov_deg, ViewerConfig::default().fov_deg);
}
