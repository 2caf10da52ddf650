use clap::Parser;
use env_logger::Env;
use geolens::{
    console::{show_intro, Args, PartialArgs, SNAPSHOT_HEADER},
    error::{OpticsError, OpticsResult},
    scene::SceneSnapshot,
    OpticScene, SceneDocument,
};
use log::info;
use std::fs;
use std::path::Path;

fn read_and_parse_scene(path: &Path) -> OpticsResult<OpticScene> {
    info!("Reading scene from {}", path.display());
    let document = SceneDocument::from_file(path)?;
    document.into_scene()
}

fn write_snapshot(snapshot: &SceneSnapshot, output: Option<&Path>) -> OpticsResult<()> {
    let serialized = serde_yaml::to_string(snapshot)
        .map_err(|e| OpticsError::Other(format!("serialization of snapshot failed: {e}")))?;
    let serialized = format!("{SNAPSHOT_HEADER}\n{serialized}");
    if let Some(path) = output {
        info!("Write snapshot to {}", path.display());
        fs::write(path, serialized).map_err(|e| {
            OpticsError::Console(format!("writing snapshot file {} failed: {e}", path.display()))
        })?;
    } else {
        println!("{serialized}");
    }
    Ok(())
}

fn geolens() -> OpticsResult<()> {
    //parse CLI arguments
    let args = Args::try_from(PartialArgs::parse())?;
    show_intro();

    //read scene from file
    let mut scene = read_and_parse_scene(&args.file_path)?;
    if let Some(rays_mode) = args.rays_mode {
        info!("Override rays mode: {rays_mode}");
        scene.set_rays_mode(rays_mode);
    }
    //compute images, rays, guides and jump points
    info!(
        "Compute scene with {} object(s) in rays mode {}",
        scene.objects().len(),
        scene.rays_mode()
    );
    let snapshot = scene.recompute()?;
    write_snapshot(&snapshot, args.output.as_deref())
}

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    if let Err(e) = geolens() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
