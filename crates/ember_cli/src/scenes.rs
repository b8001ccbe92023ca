//! Preset scenes.
//!
//! Each preset returns a fully built `World` plus the camera framing it.
//! The aspect ratio is applied later from the render resolution.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use ember_core::{load_obj, LoadResult, Mesh};
use ember_renderer::{
    CameraConfig, Color, Dielectric, Lambertian, Light, Material, Metal, Sphere, Triangle, Vec3,
    World,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Diffuse sphere and mirror triangle over a green ground
    Spheres,
    /// The same set lit only by a small bright sphere
    Light,
    /// Small sphere lit by a huge distant emitter
    Planet,
    /// Glass and brushed metal spheres
    Glass,
    /// A user OBJ file over a ground sphere
    Mesh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MeshMaterial {
    Lambertian,
    Metal,
    Glass,
    Light,
}

pub struct Scene {
    pub world: World,
    pub camera: CameraConfig,
}

pub fn build(
    kind: SceneKind,
    mesh_path: Option<&Path>,
    material: MeshMaterial,
    smooth: bool,
) -> Result<Scene> {
    let scene = match kind {
        SceneKind::Spheres => spheres(),
        SceneKind::Light => light(),
        SceneKind::Planet => planet(),
        SceneKind::Glass => glass(),
        SceneKind::Mesh => {
            let Some(path) = mesh_path else {
                bail!("the mesh scene needs an OBJ file (--mesh)");
            };
            let mut mesh = load_obj(path)
                .with_context(|| format!("Failed to load mesh {}", path.display()))?;
            if smooth {
                smooth_normals(&mut mesh);
            }
            mesh_scene(&mesh, material)?
        }
    };

    log::info!("Built {:?} scene with {} objects", kind, scene.world.len());
    Ok(scene)
}

fn daylight() -> World {
    World::new(Color::new(0.5, 0.7, 1.0), Color::ONE)
}

fn mirror_triangle() -> Triangle<Metal> {
    Triangle::with_normals(
        Vec3::new(-2.0, -1.0, -2.5),
        Vec3::new(0.0, 2.0, -2.5),
        Vec3::new(2.0, -1.0, -2.5),
        [Vec3::Z; 3],
        Metal::new(Color::splat(0.8), 0.99),
    )
}

fn ground(y: f64, albedo: Color) -> Sphere<Lambertian> {
    Sphere::new(Vec3::new(0.0, y - 100.0, -1.0), 100.0, Lambertian::new(albedo))
}

fn grey_ball() -> Sphere<Lambertian> {
    Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Lambertian::new(Color::splat(0.8)))
}

fn spheres() -> Scene {
    let mut world = daylight();
    world.add(Box::new(mirror_triangle()));
    world.add(Box::new(grey_ball()));
    world.add(Box::new(ground(-0.5, Color::new(0.2, 0.8, 0.2))));

    let camera = CameraConfig::new()
        .with_position(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(75.0, 1.0 / 16.0, 1.0)
        .focused_on_target();

    Scene { world, camera }
}

fn light() -> Scene {
    let mut world = World::new(Color::ZERO, Color::ZERO);
    world.add(Box::new(mirror_triangle()));
    world.add(Box::new(grey_ball()));
    let bulb = Light::new(Color::splat(10.0));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 2.0, -0.5), 0.3, bulb)));
    world.add(Box::new(ground(-0.5, Color::new(0.2, 0.8, 0.2))));

    let camera = CameraConfig::new()
        .with_position(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.4, 0.15, -1.0), Vec3::Y)
        .with_lens(90.0, 1.0 / 8.0, 1.0)
        .focused_on_target();

    Scene { world, camera }
}

fn planet() -> Scene {
    let mut world = World::new(Color::ZERO, Color::ZERO);
    let grey = Lambertian::new(Color::splat(0.8));
    let sun = Light::new(Color::splat(2.0));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, grey)));
    world.add(Box::new(Sphere::new(Vec3::new(-50.0, 50.0, -15.0), 45.0, sun)));

    let camera = CameraConfig::new()
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(55.0, 0.0, 1.0);

    Scene { world, camera }
}

fn glass() -> Scene {
    let mut world = daylight();
    let brass = Metal::new(Color::new(0.9, 0.6, 0.3), 0.85);
    let red = Lambertian::new(Color::new(0.8, 0.2, 0.2));
    world.add(Box::new(Sphere::new(Vec3::new(-0.55, 0.0, -1.2), 0.5, Dielectric::new(1.4))));
    world.add(Box::new(Sphere::new(Vec3::new(0.55, 0.0, -1.4), 0.5, brass)));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -0.3, -2.4), 0.2, red)));
    world.add(Box::new(ground(-0.5, Color::splat(0.6))));

    let camera = CameraConfig::new()
        .with_position(Vec3::new(0.0, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.2), Vec3::Y)
        .with_lens(60.0, 1.0 / 32.0, 1.0)
        .focused_on_target();

    Scene { world, camera }
}

fn mesh_scene(mesh: &Mesh, material: MeshMaterial) -> Result<Scene> {
    let Some((min, _)) = mesh.bounds() else {
        bail!("mesh has no vertices");
    };
    let center = mesh.center();
    let size = mesh.size().max(1e-3);

    let mut world = daylight();
    match material {
        MeshMaterial::Lambertian => {
            add_mesh(&mut world, mesh, Lambertian::new(Color::splat(0.8)))?
        }
        MeshMaterial::Metal => {
            add_mesh(&mut world, mesh, Metal::new(Color::new(0.9, 0.3, 0.3), 0.99))?
        }
        MeshMaterial::Glass => add_mesh(&mut world, mesh, Dielectric::new(1.4))?,
        MeshMaterial::Light => add_mesh(&mut world, mesh, Light::new(Color::splat(2.0)))?,
    }

    // Ground sized to the mesh, touching its lowest point
    let ground_radius = 100.0 * size;
    world.add(Box::new(Sphere::new(
        Vec3::new(center.x, min.y - ground_radius, center.z),
        ground_radius,
        Lambertian::new(Color::splat(0.6)),
    )));

    let eye = center + Vec3::new(0.0, 0.3, 1.0) * size;
    let camera = CameraConfig::new()
        .with_position(eye, center, Vec3::Y)
        .with_lens(60.0, 0.0, 1.0)
        .focused_on_target();

    Ok(Scene { world, camera })
}

/// Give a mesh without vertex normals area-weighted smooth ones. Normals
/// that shipped with the file are kept.
fn smooth_normals(mesh: &mut Mesh) {
    if mesh.has_normals() {
        log::debug!("Mesh already has vertex normals, keeping them");
        return;
    }
    mesh.compute_normals();
    log::info!("Computed smooth normals for {} vertices", mesh.vertex_count());
}

fn add_mesh<M: Material + Clone + 'static>(
    world: &mut World,
    mesh: &Mesh,
    material: M,
) -> LoadResult<()> {
    let triangles = Triangle::from_mesh(mesh, material)?;
    log::debug!("Adding {} mesh triangles", triangles.len());
    world.extend(triangles);
    Ok(())
}
