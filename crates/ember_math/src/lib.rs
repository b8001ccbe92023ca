//! Ember math: vectors, rays and intervals for the path tracer.
//!
//! All geometry is double precision. `Vec3` is used interchangeably as a
//! point, a direction and a linear RGB color.

// Re-export glam for convenience
pub use glam;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{
    gen_f64, near_zero, random_in_hemisphere, random_in_unit_disk, random_in_unit_sphere,
    random_unit_vector, reflect, refract, Color, Vec3,
};
