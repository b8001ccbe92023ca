mod cli;
mod scenes;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::save_png;
use ember_renderer::Renderer;

use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let config = args.render_config()?;
    let scene = scenes::build(args.scene, args.mesh.as_deref(), args.material, args.smooth)?;
    let camera = scene
        .camera
        .with_resolution(config.width, config.height)
        .build();

    let renderer = Renderer::new(config).context("Failed to set up renderer")?;
    let output = renderer.render(&camera, &scene.world)?;

    let image = &output.image;
    save_png(&args.output, image.width, image.height, &image.to_rgba())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Wrote {} ({} rows on {} threads in {:.2?})",
        args.output.display(),
        output.stats.rows,
        output.stats.threads,
        output.stats.elapsed
    );

    Ok(())
}
