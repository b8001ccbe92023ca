//! The world: every primitive in the scene plus the sky.

use crate::{Color, HitRecord, Hittable, Interval, Ray};

/// Aggregate of all primitives and the ambient sky gradient.
///
/// Built once before rendering and shared read-only by every worker.
pub struct World {
    objects: Vec<Box<dyn Hittable>>,
    /// Sky color straight up
    pub sky_color_above: Color,
    /// Sky color straight down
    pub sky_color_below: Color,
}

impl World {
    /// Create an empty world with the given sky gradient.
    pub fn new(sky_color_above: Color, sky_color_below: Color) -> Self {
        Self {
            objects: Vec::new(),
            sky_color_above,
            sky_color_below,
        }
    }

    /// Add an object to the world.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Add many objects at once, keeping their order.
    pub fn extend<H: Hittable + 'static>(&mut self, objects: impl IntoIterator<Item = H>) {
        self.objects
            .extend(objects.into_iter().map(|o| Box::new(o) as Box<dyn Hittable>));
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the world is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Find the nearest hit within `ray_t`.
    ///
    /// Each object is queried with the interval narrowed to the closest hit
    /// so far. A later object only replaces the current hit when it is
    /// strictly closer, so on equal `t` the earliest added object wins.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(max)) {
                if closest.as_ref().map_or(true, |best| rec.t < best.t) {
                    closest = Some(rec);
                }
            }
        }

        closest
    }

    /// Background radiance for a ray that hit nothing.
    ///
    /// Blends from `sky_color_below` to `sky_color_above` with the ray's
    /// vertical direction remapped from [-1, 1] to [0, 1].
    pub fn ambient_color(&self, ray: &Ray) -> Color {
        let unit_direction = ray.direction().normalize();
        let a = 0.5 * (unit_direction.y + 1.0);
        self.sky_color_below * (1.0 - a) + self.sky_color_above * a
    }
}

impl Default for World {
    /// Empty world under a white-to-blue daylight sky.
    fn default() -> Self {
        Self::new(Color::new(0.5, 0.7, 1.0), Color::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Light, Sphere, Triangle, Vec3};

    fn forward() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_empty_world_misses() {
        let world = World::default();
        assert!(world.is_empty());
        assert!(world.hit(&forward(), Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_nearest_hit_wins_regardless_of_order() {
        let white = Lambertian::new(Vec3::ONE);
        let mut world = World::default();
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, white)));
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, white)));
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -9.0), 1.0, white)));

        let rec = world.hit(&forward(), Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_equal_t_first_added_wins() {
        let mut world = World::default();
        let first = Color::new(1.0, 0.0, 0.0);
        let second = Color::new(0.0, 1.0, 0.0);
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, Light::new(first))));
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, Light::new(second))));

        let rec = world.hit(&forward(), Interval::new(0.001, f64::INFINITY)).unwrap();
        assert_eq!(rec.material.emitted(rec.u, rec.v, rec.p), first);
    }

    #[test]
    fn test_mixed_primitives() {
        let mut world = World::default();
        let white = Lambertian::new(Vec3::ONE);
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 0.5, white)));
        world.extend([Triangle::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(1.0, -1.0, -2.0),
            Vec3::new(0.0, 1.0, -2.0),
            Light::new(Color::splat(3.0)),
        )]);
        assert_eq!(world.len(), 2);

        let rec = world.hit(&forward(), Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-12);
        assert_eq!(rec.material.emitted(rec.u, rec.v, rec.p), Color::splat(3.0));
    }

    #[test]
    fn test_hit_respects_interval() {
        let mut world = World::default();
        let white = Lambertian::new(Vec3::ONE);
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, white)));

        assert!(world.hit(&forward(), Interval::new(0.001, 3.0)).is_none());
        assert!(world.hit(&forward(), Interval::new(0.001, 4.0)).is_some());
    }

    #[test]
    fn test_ambient_gradient() {
        let above = Color::new(0.5, 0.7, 1.0);
        let below = Color::ONE;
        let world = World::new(above, below);

        let up = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0));
        let down = Ray::new(Vec3::ZERO, Vec3::new(0.0, -0.5, 0.0));
        let level = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));

        assert!((world.ambient_color(&up) - above).length() < 1e-12);
        assert!((world.ambient_color(&down) - below).length() < 1e-12);
        assert!((world.ambient_color(&level) - (above + below) * 0.5).length() < 1e-12);
    }
}
