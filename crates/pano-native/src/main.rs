use anyhow::Context;
use clap::Parser;
use pano_core::{Scene, TourSession, TourStore, UploadConstraints, UploadFile, Uploader};
use pano_native::cli::{AddSceneArgs, CheckArgs, Cli, Command, ViewArgs};
use pano_native::{check_tour, content_type_for, JsonFileStore, LocalUploader, Severity};

mod preview;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match Cli::parse().command {
        Command::View(args) => view(args),
        Command::Check(args) => check(args),
        Command::AddScene(args) => add_scene(args),
    }
}

fn view(args: ViewArgs) -> anyhow::Result<()> {
    let config = args.config.resolve()?;
    let store = JsonFileStore::new(&args.tour);
    let tour = store
        .load()
        .with_context(|| format!("loading {}", args.tour.display()))?;
    let mut session = TourSession::new(tour, config);
    if let Some(id) = &args.scene {
        session.switch_scene(id)?;
    }
    preview::run(session, store, args.note)
}

fn check(args: CheckArgs) -> anyhow::Result<()> {
    let config = args.config.resolve()?;
    let store = JsonFileStore::new(&args.tour);
    let tour = store
        .load()
        .with_context(|| format!("loading {}", args.tour.display()))?;
    let findings = check_tour(&tour, &config, &store.base_dir());
    for f in &findings {
        println!("{f}");
    }
    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    println!(
        "{}: {} scenes, {} errors, {} warnings",
        args.tour.display(),
        tour.scenes.len(),
        errors,
        findings.len() - errors
    );
    if errors > 0 {
        anyhow::bail!("{} problems in {}", errors, args.tour.display());
    }
    Ok(())
}

fn add_scene(args: AddSceneArgs) -> anyhow::Result<()> {
    let mut store = JsonFileStore::new(&args.tour);
    let default_title = args
        .tour
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Tour")
        .to_string();
    let mut tour = store.load_or_create(&default_title)?;

    let content_type = content_type_for(&args.image)
        .with_context(|| format!("unknown image type: {}", args.image.display()))?;
    let file_name = args
        .image
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("panorama")
        .to_string();
    let file = UploadFile {
        name: file_name,
        content_type: content_type.to_string(),
        bytes: std::fs::read(&args.image)
            .with_context(|| format!("reading {}", args.image.display()))?,
    };
    let url = LocalUploader::new(store.base_dir()).upload(&file, &UploadConstraints::panoramas())?;

    let title = args.title.unwrap_or_else(|| {
        args.image
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Scene")
            .to_string()
    });
    let scene = Scene::new_from_upload(title, url);
    let id = scene.id.clone();
    tour.push_scene(scene)?;
    if args.start {
        tour.starting_scene_id = Some(id.clone());
    }
    store.save_tour(&tour)?;
    println!("{id}");
    Ok(())
}
