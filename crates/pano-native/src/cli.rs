use clap::{Args, Parser, Subcommand};
use pano_core::ViewerConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pano")]
#[command(about = "Panorama tour previewer and authoring tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a tour in a desktop window.
    View(ViewArgs),
    /// Report broken links and other problems in a tour file.
    Check(CheckArgs),
    /// Copy a panorama next to the tour and append a scene for it.
    AddScene(AddSceneArgs),
}

#[derive(Args, Default)]
pub struct ConfigArgs {
    /// JSON file with viewer settings; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub fov: Option<f32>,
    #[arg(long)]
    pub rotate_speed: Option<f32>,
    #[arg(long)]
    pub fade_out: Option<f32>,
    #[arg(long)]
    pub fade_in: Option<f32>,
    #[arg(long)]
    pub radius: Option<f32>,
    /// World units per icon pixel.
    #[arg(long)]
    pub marker_scale: Option<f32>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> anyhow::Result<ViewerConfig> {
        let base = match &self.config {
            Some(path) => ViewerConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => ViewerConfig::default(),
        };
        Ok(self.apply(base))
    }

    pub fn apply(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(v) = self.fov {
            config.fov_deg = v;
        }
        if let Some(v) = self.rotate_speed {
            config.rotate_speed = v;
        }
        if let Some(v) = self.fade_out {
            config.fade_out_sec = v;
        }
        if let Some(v) = self.fade_in {
            config.fade_in_sec = v;
        }
        if let Some(v) = self.radius {
            config.sphere_radius = v;
        }
        if let Some(v) = self.marker_scale {
            config.marker_world_per_px = v;
        }
        config.sanitized()
    }
}

#[derive(Args)]
pub struct ViewArgs {
    pub tour: PathBuf,
    /// Scene to open instead of the starting scene.
    #[arg(long)]
    pub scene: Option<String>,
    /// Title and text for hotspots placed with Enter in edit mode.
    #[arg(long, default_value = "Note")]
    pub note: String,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct CheckArgs {
    pub tour: PathBuf,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct AddSceneArgs {
    pub tour: PathBuf,
    pub image: PathBuf,
    /// Defaults to the image file name.
    #[arg(long)]
    pub title: Option<String>,
    /// Make the new scene the starting scene.
    #[arg(long)]
    pub start: bool,
}
