//! Wavefront OBJ loading.
//!
//! Every model in a file is merged into a single `Mesh`. Faces are
//! triangulated on load. Any malformed line or dangling index fails the
//! whole load, so callers never see partially valid geometry.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ember_math::Vec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur during mesh loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No triangles found in OBJ data")]
    NoGeometry,

    #[error("Vertex index {index} out of range ({vertex_count} vertices)")]
    InvalidIndex { index: u32, vertex_count: usize },

    #[error("Index count {0} is not a multiple of 3")]
    IncompleteFace(usize),

    #[error("{normals} normals for {vertices} vertices")]
    NormalCountMismatch { normals: usize, vertices: usize },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Load an OBJ file from disk.
pub fn load_obj<P: AsRef<Path>>(path: P) -> LoadResult<Mesh> {
    let path = path.as_ref();
    log::info!("Loading mesh from: {:?}", path);

    let mut reader = BufReader::new(File::open(path)?);
    load_obj_from_reader(&mut reader)
}

/// Load OBJ data from any buffered reader. Material libraries are ignored.
pub fn load_obj_from_reader<R: BufRead>(reader: &mut R) -> LoadResult<Mesh> {
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let mut all_have_normals = true;

    for model in &models {
        let mesh = &model.mesh;
        let base = positions.len() as u32;

        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );

        if mesh.normals.is_empty() {
            all_have_normals = false;
        } else {
            normals.extend(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0] as f64, n[1] as f64, n[2] as f64)),
            );
        }

        indices.extend(mesh.indices.iter().map(|i| i + base));
    }

    if indices.is_empty() {
        return Err(LoadError::NoGeometry);
    }

    if !all_have_normals && !normals.is_empty() {
        log::warn!("Some OBJ models lack normals, falling back to flat shading");
    }
    let normals = (all_have_normals && !normals.is_empty()).then_some(normals);

    let mesh = Mesh::new(positions, indices, normals);
    mesh.validate()?;

    log::info!(
        "Loaded {} vertices, {} triangles from {} model(s)",
        mesh.vertex_count(),
        mesh.triangle_count(),
        models.len()
    );
    Ok(mesh)
}
