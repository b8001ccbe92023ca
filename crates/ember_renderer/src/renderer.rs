//! Parallel scanline render driver.
//!
//! The image is split into rows. Each row is claimed by exactly one rayon
//! worker, which owns a private random stream and writes that row's pixels
//! once. Completed rows are reported over a bounded channel to a reporter
//! thread that logs progress.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use ember_math::gen_f64;
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::integrator::{color_to_rgba, ray_color};
use crate::sampler::{SeedPolicy, WorkerRng};
use crate::{Camera, Color, World};

/// Errors from configuring or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Render cancelled after {completed_rows} of {total_rows} rows")]
    Cancelled {
        completed_rows: usize,
        total_rows: usize,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Worker threads, 0 for one per logical CPU
    pub threads: usize,
    /// How worker random streams are seeded
    pub seed: SeedPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 200,
            samples_per_pixel: 100,
            max_depth: 50,
            threads: 0,
            seed: SeedPolicy::Clock,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Averaged linear radiance per pixel, row 0 at the top.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Gamma-corrected 8-bit RGBA bytes, row-major from the top.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgba(*color))
            .collect()
    }
}

/// Timing and bookkeeping for a finished render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub rows: usize,
    pub threads: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
}

/// Estimate one pixel by averaging jittered camera samples.
///
/// `y` is the sampling row with 0 at the bottom of the image. Every sample
/// lands inside the pixel's footprint, so `(s, t)` stays within `[0, 1)`.
pub fn render_pixel(
    camera: &Camera,
    world: &World,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = config.width.max(1) as f64;
    let height = config.height.max(1) as f64;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f64 + gen_f64(rng)) / width;
        let t = (y as f64 + gen_f64(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, 0, config.max_depth, rng);
    }

    pixel_color / config.samples_per_pixel as f64
}

/// Multi-threaded scanline renderer.
pub struct Renderer {
    config: RenderConfig,
    pool: rayon::ThreadPool,
}

impl Renderer {
    /// Validate the configuration and build the worker pool.
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("ember-worker-{}", i))
            .build()?;

        Ok(Self { config, pool })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Render the whole image, blocking until every row is written.
    pub fn render(&self, camera: &Camera, world: &World) -> RenderResult<RenderOutput> {
        self.render_with_cancel(camera, world, &AtomicBool::new(false))
    }

    /// Render, stopping early once `cancel` is set.
    ///
    /// Rows already in flight finish; unclaimed rows are skipped and the
    /// result is `RenderError::Cancelled`.
    pub fn render_with_cancel(
        &self,
        camera: &Camera,
        world: &World,
        cancel: &AtomicBool,
    ) -> RenderResult<RenderOutput> {
        let config = &self.config;
        let width = config.width as usize;
        let height = config.height;
        let total_rows = height as usize;

        log::info!(
            "Rendering {}x{} @ {} spp, max depth {}, {} threads, seed {:?}",
            config.width,
            config.height,
            config.samples_per_pixel,
            config.max_depth,
            self.threads(),
            config.seed
        );

        let start = Instant::now();
        let mut image = ImageBuffer::new(config.width, config.height);
        let completed = AtomicUsize::new(0);

        thread::scope(|scope| {
            let (progress_tx, progress_rx) = mpsc::sync_channel::<u32>(total_rows);
            let reporter = scope.spawn(move || report_progress(progress_rx, total_rows));

            self.pool.install(|| {
                image
                    .pixels
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each_init(
                        || WorkerRng::new(config.seed),
                        |worker, (out_row, row_pixels)| {
                            if cancel.load(Ordering::Relaxed) {
                                return;
                            }

                            let y = height - 1 - out_row as u32;
                            let rng = worker.for_scanline(y);
                            for (x, pixel) in row_pixels.iter_mut().enumerate() {
                                *pixel = render_pixel(camera, world, x as u32, y, config, rng);
                            }

                            completed.fetch_add(1, Ordering::Relaxed);
                            // Progress is best effort; never stall a worker on it
                            let _ = progress_tx.try_send(y);
                        },
                    );
            });

            drop(progress_tx);
            if let Err(panic) = reporter.join() {
                std::panic::resume_unwind(panic);
            }
        });

        let completed_rows = completed.into_inner();
        if completed_rows < total_rows {
            log::warn!("Render cancelled with {}/{} rows done", completed_rows, total_rows);
            return Err(RenderError::Cancelled {
                completed_rows,
                total_rows,
            });
        }

        let stats = RenderStats {
            rows: completed_rows,
            threads: self.threads(),
            elapsed: start.elapsed(),
        };
        log::info!("Render complete in {:.2?}", stats.elapsed);

        Ok(RenderOutput { image, stats })
    }
}

/// Drain row notifications and log percent-complete in 10% steps.
fn report_progress(rx: mpsc::Receiver<u32>, total_rows: usize) {
    let mut done = 0usize;
    let mut last_decile = 0usize;

    for row in rx {
        done += 1;
        log::trace!("Scanline {} done ({}/{})", row, done, total_rows);

        let decile = done * 10 / total_rows.max(1);
        if decile > last_decile {
            last_decile = decile;
            log::info!("Progress: {}%", decile * 10);
        }
    }

    log::debug!("Progress reporter saw {}/{} rows", done, total_rows);
}
