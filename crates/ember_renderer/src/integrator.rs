//! Light transport estimator and display conversion.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a hard bounce budget
//! - Emission from light materials
//! - Gamma correction for display

use rand::RngCore;

use crate::{Color, Interval, Ray, World};

/// Smallest accepted hit distance. Keeps scattered rays from re-hitting
/// the surface they start on (shadow acne).
pub const T_MIN: f64 = 0.001;

/// Compute the radiance arriving along a ray.
///
/// `depth` counts bounces so far, starting at 0 for camera rays. Once it
/// exceeds `max_depth` the path is cut off and contributes black.
pub fn ray_color(
    ray: &Ray,
    world: &World,
    depth: u32,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    if depth > max_depth {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f64::INFINITY)) else {
        return world.ambient_color(ray);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let incoming = ray_color(&result.scattered, world, depth + 1, max_depth, rng);
            emission + result.attenuation * incoming
        }
        // Absorbed: only the surface's own emission reaches the viewer
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let quantize = |c: f64| (255.0 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}
