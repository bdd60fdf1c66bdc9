use crate::assets::{resolve_asset, AssetSource};
use pano_core::constants::sphere_center_vec3;
use pano_core::{LinkProblem, Tour, ViewerConfig};
use std::fmt;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub scene_id: Option<String>,
    pub message: String,
}

impl Finding {
    fn error(scene_id: Option<&str>, message: String) -> Self {
        Self {
            severity: Severity::Error,
            scene_id: scene_id.map(str::to_string),
            message,
        }
    }

    fn warning(scene_id: Option<&str>, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            scene_id: scene_id.map(str::to_string),
            message,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.scene_id {
            Some(id) => write!(f, "{level} [{id}]: {}", self.message),
            None => write!(f, "{level}: {}", self.message),
        }
    }
}

/// Broken links and unresolvable starting scenes are errors; hotspots off the
/// sphere and missing local images are warnings.
pub fn check_tour(tour: &Tour, config: &ViewerConfig, base_dir: &Path) -> Vec<Finding> {
    let mut out = Vec::new();
    if tour.scenes.is_empty() {
        out.push(Finding::warning(None, "tour has no scenes".to_string()));
    }
    if let Some(start) = tour.starting_scene_id.as_deref() {
        if !tour.contains_scene(start) {
            out.push(Finding::error(
                None,
                format!("starting scene {start} does not exist"),
            ));
        }
    }
    for link in tour.broken_links() {
        let what = match &link.problem {
            LinkProblem::MissingTarget => "has no target scene".to_string(),
            LinkProblem::UnknownTarget(t) => format!("targets unknown scene {t}"),
            LinkProblem::SelfTarget => "targets its own scene".to_string(),
        };
        out.push(Finding::error(
            Some(&link.scene_id),
            format!("navigation hotspot {} {}", link.hotspot_id, what),
        ));
    }
    let center = sphere_center_vec3();
    for scene in &tour.scenes {
        for h in &scene.hotspots {
            if !h.is_on_sphere(center, config.sphere_radius) {
                out.push(Finding::warning(
                    Some(&scene.id),
                    format!(
                        "hotspot {} sits {:.1} from the center, sphere radius is {}",
                        h.id,
                        (h.position - center).length(),
                        config.sphere_radius
                    ),
                ));
            }
        }
        if let AssetSource::Local(path) = resolve_asset(base_dir, &scene.image_url) {
            if !path.exists() {
                out.push(Finding::warning(
                    Some(&scene.id),
                    format!("panorama {} not found", path.display()),
                ));
            }
        }
    }
    out
}
