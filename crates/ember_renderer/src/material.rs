//! Material trait for surface scattering and emission.

use ember_math::{
    gen_f64, near_zero, random_in_hemisphere, random_in_unit_sphere, reflect, refract,
};
use rand::RngCore;

use crate::{hittable::HitRecord, Color, Ray, Vec3};

/// Outgoing ray and the color it is filtered by.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Each material's sampling distribution and attenuation are matched, so
/// the integrator never needs an explicit probability density.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_in_hemisphere(rec.normal, rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    glossiness: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `glossiness`: 1.0 = perfect mirror, 0.0 = very rough
    pub fn new(albedo: Color, glossiness: f64) -> Self {
        Self {
            albedo,
            glossiness: glossiness.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let fuzz = 1.0 - self.glossiness;
        let scattered_dir = if fuzz > 0.0 {
            reflected + fuzz * random_in_unit_sphere(rng)
        } else {
            reflected
        };

        // Fuzzed reflections that dip below the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance.
    fn reflectance(cosine: f64, ratio: f64) -> f64 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        // Index-matched interfaces reflect nothing at any angle
        if r0 == 0.0 {
            return 0.0;
        }
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Pure emitter. Emission components may exceed 1.0.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    emission: Color,
}

impl Light {
    /// Create a new light with the given emission color.
    pub fn new(emission: Color) -> Self {
        Self { emission }
    }
}

impl Material for Light {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        self.emission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(ray: &Ray, normal: Vec3, material: &'a dyn Material) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, normal, (0.0, 0.0), material)
    }

    #[test]
    fn test_lambertian_scatters_into_normal_hemisphere() {
        let mat = Lambertian::new(Color::new(0.2, 0.4, 0.6));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = record(&ray, Vec3::Z, &mat);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..256 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.2, 0.4, 0.6));
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(result.scattered.direction().dot(rec.normal) > 0.0);
        }
    }

    #[test]
    fn test_glossy_metal_is_perfect_mirror() {
        let mat = Metal::new(Color::splat(0.9), 1.0);
        let dir = Vec3::new(1.0, 0.0, -1.0);
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 1.0), dir);
        let rec = record(&ray, Vec3::Z, &mat);
        let mut rng = StdRng::seed_from_u64(2);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-12);
        assert_eq!(result.attenuation, Color::splat(0.9));
    }

    #[test]
    fn test_metal_absorbs_reflection_below_surface() {
        let mat = Metal::new(Color::ONE, 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        // Hand-built record whose normal points along the ray
        let mut rec = record(&ray, Vec3::Z, &mat);
        rec.normal = Vec3::NEG_Z;
        let mut rng = StdRng::seed_from_u64(3);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_rough_metal_stays_above_surface() {
        let mat = Metal::new(Color::ONE, 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, -1.0));
        let rec = record(&ray, Vec3::Z, &mat);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..256 {
            if let Some(result) = mat.scatter(&ray, &rec, &mut rng) {
                assert!(result.scattered.direction().dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_index_matched_dielectric_is_invisible() {
        let mat = Dielectric::new(1.0);
        let mut rng = StdRng::seed_from_u64(5);

        for dir in [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.3, -0.2, -1.0),
            Vec3::new(2.0, 0.0, -0.1),
        ] {
            let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), dir);
            let rec = record(&ray, Vec3::Z, &mat);

            for _ in 0..64 {
                let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
                assert!((result.scattered.direction() - dir.normalize()).length() < 1e-9);
                assert_eq!(result.attenuation, Color::ONE);
            }
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Leaving glass at a grazing angle: outward normal along the ray's side
        let dir = Vec3::new(1.0, 0.0, 0.2).normalize();
        let ray = Ray::new(Vec3::ZERO, dir);
        let rec = record(&ray, Vec3::Z, &mat);
        assert!(!rec.front_face);

        let mut rng = StdRng::seed_from_u64(6);
        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = reflect(dir, rec.normal);
        assert!((result.scattered.direction() - expected).length() < 1e-12);
    }

    #[test]
    fn test_light_never_scatters() {
        let emission = Color::new(10.0, 4.0, 2.5);
        let mat = Light::new(emission);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = record(&ray, Vec3::Z, &mat);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..16 {
            assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
        }
        assert_eq!(mat.emitted(rec.u, rec.v, rec.p), emission);
    }

    #[test]
    fn test_non_emitters_are_black() {
        assert_eq!(Lambertian::new(Color::ONE).emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
        assert_eq!(Metal::new(Color::ONE, 0.5).emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
        assert_eq!(Dielectric::new(1.5).emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }
}
