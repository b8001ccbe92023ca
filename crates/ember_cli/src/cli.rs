use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ember_renderer::{RenderConfig, SeedPolicy};
use log::LevelFilter;

use crate::scenes::{MeshMaterial, SceneKind};

/// Log levels selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Offline Monte Carlo path tracer", version)]
pub struct Args {
    /// JSON render configuration; flags below override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples_per_pixel: Option<u32>,

    /// Maximum bounce depth
    #[arg(long, short = 'd')]
    pub max_depth: Option<u32>,

    /// Worker threads (0 = one per logical CPU)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Fixed seed for a reproducible image (default: seeded from the clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Preset scene to render
    #[arg(long, value_enum, default_value = "spheres")]
    pub scene: SceneKind,

    /// OBJ file for the `mesh` scene
    #[arg(long, required_if_eq("scene", "mesh"))]
    pub mesh: Option<PathBuf>,

    /// Surface material for the loaded mesh
    #[arg(long, value_enum, default_value = "lambertian")]
    pub material: MeshMaterial,

    /// Compute smooth vertex normals for meshes that have none
    #[arg(long)]
    pub smooth: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Resolve the render configuration: defaults, then the config file,
    /// then individual flags.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(spp) = self.samples_per_pixel {
            config.samples_per_pixel = spp;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(seed) = self.seed {
            config.seed = SeedPolicy::Fixed(seed);
        }

        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    log::debug!("Loaded render config from {}", path.display());
    Ok(config)
}
