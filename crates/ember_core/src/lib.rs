//! Ember Core - renderer-agnostic scene data and file I/O.
//!
//! This crate provides:
//!
//! - **Mesh geometry**: `Mesh` with positions, optional vertex normals and
//!   triangle indices
//! - **OBJ support**: Wavefront OBJ loading through `tobj`
//! - **Image output**: PNG encoding of 8-bit RGBA buffers
//!
//! # Example
//!
//! ```ignore
//! use ember_core::load_obj;
//!
//! let mesh = load_obj("teapot.obj")?;
//! println!("Loaded {} triangles", mesh.triangle_count());
//! ```

pub mod mesh;
pub mod obj;
pub mod output;

// Re-export commonly used types
pub use mesh::{Mesh, MeshTriangle};
pub use obj::{load_obj, load_obj_from_reader, LoadError, LoadResult};
pub use output::{save_png, OutputError, OutputResult};
