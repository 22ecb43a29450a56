use cgmath::Vector3;
use thiserror::Error;

use super::{Aabb, MeshData, Vertex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("position array has {0} floats, which is not a multiple of 3")]
    MalformedPositions(usize),
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
    #[error("mapped range holds {actual} elements but {required} are needed")]
    MappedRangeTooSmall { required: usize, actual: usize },
}

/// A mesh containing a list of vertices and triangle indices.
///
/// The bounding box is computed once at construction. Mesh data is immutable
/// afterwards; move the owning [`Model`](super::Model) instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl Mesh {
    /// Index format of every mesh index buffer.
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;
    /// Bytes per index.
    pub const INDEX_STRIDE: wgpu::BufferAddress = std::mem::size_of::<u32>() as wgpu::BufferAddress;

    /// Builds one [`Vertex`] per 3 position floats.
    ///
    /// Normals are only used if there are exactly 3 per vertex and texture
    /// coordinates only if there are exactly 2 per vertex. Otherwise that
    /// attribute is zero for every vertex: a mesh with missing or partial
    /// normals is still drawable, just unlit.
    ///
    /// # Errors
    ///
    /// Fails if the position array cannot be split into whole vertices or if an
    /// index points past the last vertex.
    pub fn new(data: MeshData) -> Result<Self, MeshError> {
        if data.positions.len() % 3 != 0 {
            return Err(MeshError::MalformedPositions(data.positions.len()));
        }

        let vertex_count = data.vertex_count();
        if let Some((position, &index)) = data
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                position,
                vertex_count,
            });
        }

        let has_normals = data.has_normals();
        let has_texcoords = data.has_texcoords();
        if vertex_count > 0 && !has_normals && !data.normals.is_empty() {
            log::warn!(
                "ignoring {} normal floats for {} vertices, normals are zero-filled",
                data.normals.len(),
                vertex_count
            );
        }
        if vertex_count > 0 && !has_texcoords && !data.texcoords.is_empty() {
            log::warn!(
                "ignoring {} texture coordinate floats for {} vertices, texture coordinates are zero-filled",
                data.texcoords.len(),
                vertex_count
            );
        }

        let vertices: Vec<Vertex> = (0..vertex_count)
            .map(|i| Vertex {
                position: [
                    data.positions[i * 3],
                    data.positions[i * 3 + 1],
                    data.positions[i * 3 + 2],
                ],
                normal: if has_normals {
                    [data.normals[i * 3], data.normals[i * 3 + 1], data.normals[i * 3 + 2]]
                } else {
                    [0.0; 3]
                },
                texture_coordinates: if has_texcoords {
                    [data.texcoords[i * 2], data.texcoords[i * 2 + 1]]
                } else {
                    [0.0; 2]
                },
            })
            .collect();

        let bounds = Aabb::from_points(vertices.iter().map(|v| Vector3::from(v.position)))
            .unwrap_or_default();

        log::debug!(
            "built mesh with {} vertices and {} indices",
            vertices.len(),
            data.indices.len()
        );

        Ok(Self {
            vertices,
            indices: data.indices,
            bounds,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Bounding box of all vertex positions; all zero for an empty mesh.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    /// Interleaved vertex data exactly as it is laid out in a vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Writes the interleaved vertex records into a mapped float range.
    ///
    /// Vertex `i` lands at float offset `8 * i`: position at `+0`, normal at
    /// `+3` and texture coordinates at `+6`. Floats past the last record are
    /// left untouched.
    pub fn write_vertices_to_mapped_range(&self, mapped_range: &mut [f32]) -> Result<(), MeshError> {
        let required = self.vertices.len() * Vertex::STRIDE_IN_FLOATS;
        if mapped_range.len() < required {
            return Err(MeshError::MappedRangeTooSmall {
                required,
                actual: mapped_range.len(),
            });
        }

        for (record, vertex) in mapped_range
            .chunks_exact_mut(Vertex::STRIDE_IN_FLOATS)
            .zip(&self.vertices)
        {
            vertex.write_to(record);
        }
        Ok(())
    }

    /// Copies the indices to the start of a mapped index range.
    pub fn write_indices_to_mapped_range(&self, mapped_range: &mut [u32]) -> Result<(), MeshError> {
        if mapped_range.len() < self.indices.len() {
            return Err(MeshError::MappedRangeTooSmall {
                required: self.indices.len(),
                actual: mapped_range.len(),
            });
        }
        mapped_range[..self.indices.len()].copy_from_slice(&self.indices);
        Ok(())
    }
}

impl TryFrom<MeshData> for Mesh {
    type Error = MeshError;

    fn try_from(data: MeshData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}
