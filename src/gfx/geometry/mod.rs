//! # Mesh Geometry
//!
//! This module holds the CPU-side geometry of the framework: flat attribute
//! arrays as produced by the model parsers, the interleaved [`Mesh`] built from
//! them, and the [`Model`] that places a mesh in the world.
//!
//! ## Data flow
//!
//! ```text
//! OBJ / PLY / JSON text --parse--> MeshData --Mesh::new--> Mesh --Model::new--> Model
//!                                                                   |
//!                                            create_vertex_buffer / create_index_buffer
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use gpu_workshop::gfx::geometry::{MeshData, Model};
//!
//! let data = MeshData {
//!     positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!     indices: vec![0, 1, 2],
//!     ..Default::default()
//! };
//! let model = Model::new(data, true).unwrap();
//! assert_eq!(model.num_vertices(), 3);
//! ```

pub mod aabb;
pub mod mesh;
pub mod model;
pub mod vertex;

pub use aabb::Aabb;
pub use mesh::{Mesh, MeshError};
pub use model::Model;
pub use vertex::Vertex;

use serde::{Deserialize, Serialize};

/// Flat, parallel attribute arrays describing one indexed triangle mesh.
///
/// This is what the model parsers return and the shape of a JSON model file;
/// missing JSON fields default to empty arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshData {
    /// Vertex positions, 3 floats per vertex
    pub positions: Vec<f32>,
    /// Vertex normals, 3 floats per vertex (may be empty)
    pub normals: Vec<f32>,
    /// Texture coordinates, 2 floats per vertex (may be empty)
    pub texcoords: Vec<f32>,
    /// Triangle indices, 3 per triangle
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices described by `positions`.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.positions.is_empty() && self.normals.len() == self.positions.len()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.positions.is_empty() && self.texcoords.len() * 3 == self.positions.len() * 2
    }
}
