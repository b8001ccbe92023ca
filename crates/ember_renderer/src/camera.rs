//! Camera for ray generation.
//!
//! `CameraConfig` collects user parameters; `build()` derives the
//! immutable basis used while rendering.

use ember_math::random_in_unit_disk;
use rand::RngCore;

use crate::{Ray, Vec3};

/// User-facing camera parameters.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f64,       // Vertical field of view in degrees
    aperture: f64,   // Lens diameter, 0 for a pinhole
    focus_dist: f64, // Distance from camera to plane of perfect focus

    aspect_ratio: f64,
}

impl CameraConfig {
    /// Create a camera config with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
            focus_dist: 1.0,
            aspect_ratio: 16.0 / 9.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self
    }

    /// Focus exactly on the look-at point.
    pub fn focused_on_target(mut self) -> Self {
        self.focus_dist = (self.look_from - self.look_at).length();
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Derive the aspect ratio from an image resolution.
    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        self.with_aspect_ratio(width as f64 / height.max(1) as f64)
    }

    /// Derive the immutable camera basis.
    pub fn build(&self) -> Camera {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Right-handed orthonormal basis; w points backwards
        let w = (self.look_from - self.look_at).try_normalize().unwrap_or(Vec3::Z);
        let u = self
            .vup
            .cross(w)
            .try_normalize()
            .unwrap_or_else(|| w.any_orthonormal_vector());
        let v = w.cross(u);

        let horizontal = self.focus_dist * viewport_width * u;
        let vertical = self.focus_dist * viewport_height * v;
        let lower_left_corner =
            self.look_from - horizontal / 2.0 - vertical / 2.0 - self.focus_dist * w;

        Camera {
            position: self.look_from,
            u,
            v,
            w,
            horizontal,
            vertical,
            lower_left_corner,
            lens_radius: self.aperture / 2.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    lower_left_corner: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Generate a ray through normalized image coordinates (s, t).
    ///
    /// (0, 0) is the lower-left corner of the image. With a finite aperture
    /// the origin is jittered over the lens, but every ray for a given
    /// (s, t) passes through the same point on the focal plane.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius <= 0.0 {
            Vec3::ZERO
        } else {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        };

        let focal_point = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.position + offset, focal_point - self.position - offset)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Camera basis (right, up, backward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }
}
