use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use octray_renderer::{render, save_png, save_ppm, RenderConfig, Scene};

mod cli;
mod scene_file;

use cli::Args;
use scene_file::SceneFile;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let description = match &args.scene {
        Some(path) => SceneFile::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => SceneFile::demo().context("built-in demo scene is invalid")?,
    };

    let config = RenderConfig {
        width: args.width,
        height: args.height,
        samples_per_pixel: args.samples,
        max_depth: args.max_depth,
        workers: args.workers(),
        seed: args.seed,
    };
    config.validate()?;

    let camera = description.camera(config.aspect_ratio());
    let primitives = description.primitives()?;
    info!("Scene has {} primitives", primitives.len());
    let scene = Scene::with_partition(primitives, args.split_depth)?;

    let image = render(&scene, &camera, &config)?;

    let png = args.output_path("png");
    save_png(&image, &png).with_context(|| format!("failed to write {}", png.display()))?;
    let ppm = args.output_path("ppm");
    save_ppm(&image, &ppm).with_context(|| format!("failed to write {}", ppm.display()))?;

    info!("Wrote {} and {}", png.display(), ppm.display());
    Ok(())
}
