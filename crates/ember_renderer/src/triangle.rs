//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use ember_core::{LoadResult, Mesh};

use crate::{
    hittable::{HitRecord, Hittable},
    Interval, Material, Ray, Vec3,
};

/// Parallel-ray and self-intersection tolerance.
const EPSILON: f64 = 1e-7;

/// A triangle primitive.
pub struct Triangle<M: Material> {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Optional per-vertex normals for smooth shading
    vertex_normals: Option<[Vec3; 3]>,
    /// Pre-computed face normal (unit length, zero when degenerate)
    normal: Vec3,
    /// Material
    material: M,
}

impl<M: Material> Triangle<M> {
    /// Create a flat-shaded triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        Self {
            v0,
            v1,
            v2,
            vertex_normals: None,
            normal,
            material,
        }
    }

    /// Create a smooth-shaded triangle with per-vertex normals.
    pub fn with_normals(v0: Vec3, v1: Vec3, v2: Vec3, normals: [Vec3; 3], material: M) -> Self {
        Self {
            vertex_normals: Some(normals),
            ..Self::new(v0, v1, v2, material)
        }
    }

    /// Flatten a mesh into independent triangles sharing one material.
    pub fn from_mesh(mesh: &Mesh, material: M) -> LoadResult<Vec<Self>>
    where
        M: Clone,
    {
        let triangles = mesh
            .triangles()?
            .into_iter()
            .map(|tri| {
                let [v0, v1, v2] = tri.positions;
                match tri.normals {
                    Some(normals) => Self::with_normals(v0, v1, v2, normals, material.clone()),
                    None => Self::new(v0, v1, v2, material.clone()),
                }
            })
            .collect();

        Ok(triangles)
    }

    /// Get the face normal.
    pub fn face_normal(&self) -> Vec3 {
        self.normal
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Shading normal at barycentric (u, v): blended vertex normals when
    /// present, the face normal otherwise.
    fn shading_normal(&self, u: f64, v: f64) -> Vec3 {
        match self.vertex_normals {
            Some([n0, n1, n2]) => (n0 * (1.0 - u - v) + n1 * u + n2 * v)
                .try_normalize()
                .unwrap_or(self.normal),
            None => self.normal,
        }
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle (or the triangle is degenerate)
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t <= EPSILON || !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.shading_normal(u, v),
            (u, v),
            &self.material,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Lambertian {
        Lambertian::new(Vec3::new(0.5, 0.5, 0.5))
    }

    /// Triangle in XY plane at z=-1, CCW seen from +Z
    fn unit_triangle() -> Triangle<Lambertian> {
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            grey(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = unit_triangle();

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());

        // Outside the edges
        let ray = Ray::new(Vec3::new(2.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -1.0), Vec3::X);
        assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(2.0, 2.0, -1.0),
            grey(),
        );
        assert_eq!(tri.face_normal(), Vec3::ZERO);

        let ray = Ray::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_centroid_barycentrics() {
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..100 {
            let mut random_point = || {
                Vec3::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                )
            };
            let tri = Triangle::new(random_point(), random_point(), random_point(), grey());
            if tri.face_normal() == Vec3::ZERO {
                continue;
            }

            // Approach the centroid along the normal from the front side
            let origin = tri.centroid() + tri.face_normal() * 2.0;
            let ray = Ray::new(origin, -tri.face_normal());
            let rec = tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();

            let weights = [1.0 - rec.u - rec.v, rec.u, rec.v];
            assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            for w in weights {
                assert!((0.0..=1.0).contains(&w));
                assert!((w - 1.0 / 3.0).abs() < 1e-6);
            }
            assert!((rec.t - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smooth_normals_are_interpolated() {
        let tilted = Vec3::new(1.0, 0.0, 1.0).normalize();
        let tri = Triangle::with_normals(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            [Vec3::Z, tilted, Vec3::Z],
            grey(),
        );

        // Hitting exactly at v1 gives v1's normal
        let ray = Ray::new(Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.normal - tilted).length() < 1e-9);

        // In between the normal is a unit blend
        let ray = Ray::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.normal.length() - 1.0).abs() < 1e-9);
        assert!(rec.normal.x > 0.0 && rec.normal.x < tilted.x);
    }

    #[test]
    fn test_triangle_normal_opposes_ray() {
        let mut rng = StdRng::seed_from_u64(22);
        let flat = unit_triangle();
        let smooth = Triangle::with_normals(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            [
                Vec3::new(-0.3, -0.3, 1.0).normalize(),
                Vec3::new(0.3, -0.3, 1.0).normalize(),
                Vec3::new(0.0, 0.4, 1.0).normalize(),
            ],
            grey(),
        );

        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-3.0..1.0),
            );
            let target = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), -1.0);
            let ray = Ray::new(origin, target - origin);

            for tri in [&flat, &smooth] {
                if let Some(rec) = tri.hit(&ray, Interval::new(0.001, f64::INFINITY)) {
                    assert!(ray.direction().dot(rec.normal) <= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_from_mesh() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 1, 3, 2],
            None,
        );

        let triangles = Triangle::from_mesh(&mesh, grey()).unwrap();
        assert_eq!(triangles.len(), 2);
        assert!(triangles.iter().all(|t| t.face_normal() == Vec3::Z));

        let mut broken = mesh.clone();
        broken.indices[0] = 42;
        assert!(Triangle::from_mesh(&broken, grey()).is_err());
    }
}
