//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering.
//!
//! The pipeline for every pixel sample is:
//! camera ray -> nearest hit in the [`World`] -> material scatter/emit ->
//! recurse until absorption, escape or the bounce budget runs out.
//! Scanlines are distributed over a fixed-size worker pool by [`Renderer`].

mod camera;
mod hittable;
mod integrator;
mod material;
mod renderer;
mod sampler;
mod sphere;
mod triangle;
mod world;

pub use camera::{Camera, CameraConfig};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{color_to_rgba, linear_to_gamma, ray_color, T_MIN};
pub use material::{Dielectric, Lambertian, Light, Material, Metal, ScatterResult};
pub use renderer::{
    render_pixel, ImageBuffer, RenderConfig, RenderError, RenderOutput, RenderResult,
    RenderStats, Renderer,
};
pub use sampler::{clock_seed, scanline_seed, SeedPolicy, WorkerRng};
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use world::World;

/// Re-export math types from ember_math
pub use ember_math::{Color, Interval, Ray, Vec3};
