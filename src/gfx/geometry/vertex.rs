//! # Vertex Data Structures
//!
//! This module defines the interleaved vertex format shared by every mesh of
//! the framework and the shaders that consume it.

use std::mem;

/// A 3D vertex with position, normal and texture coordinates.
///
/// # Memory Layout
///
/// `#[repr(C)]` fixes the interleaved layout the vertex shaders expect:
///
/// | attribute            | location | format      | byte offset |
/// |----------------------|----------|-------------|-------------|
/// | `position`           | 0        | `Float32x3` | 0           |
/// | `normal`             | 1        | `Float32x3` | 12          |
/// | `texture_coordinates`| 2        | `Float32x2` | 24          |
///
/// for a stride of 32 bytes (8 floats).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position coordinates [x, y, z]
    pub position: [f32; 3],
    /// Normal vector [nx, ny, nz]
    pub normal: [f32; 3],
    /// Texture coordinates [s, t]
    pub texture_coordinates: [f32; 2],
}

impl Vertex {
    /// Floats per interleaved vertex record.
    pub const STRIDE_IN_FLOATS: usize = 8;
    /// Bytes per interleaved vertex record.
    pub const STRIDE: wgpu::BufferAddress = mem::size_of::<Vertex>() as wgpu::BufferAddress;

    pub const POSITION_OFFSET: usize = 0;
    pub const NORMAL_OFFSET: usize = 3;
    pub const TEXTURE_COORDINATES_OFFSET: usize = 6;

    /// Returns the vertex buffer layout for wgpu render pipelines.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gpu_workshop::gfx::geometry::Vertex;
    ///
    /// let layout = Vertex::desc();
    /// assert_eq!(layout.array_stride, 32);
    /// ```
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }

    /// Writes this vertex as 8 floats into `record`.
    pub(crate) fn write_to(&self, record: &mut [f32]) {
        record[Self::POSITION_OFFSET..Self::NORMAL_OFFSET].copy_from_slice(&self.position);
        record[Self::NORMAL_OFFSET..Self::TEXTURE_COORDINATES_OFFSET].copy_from_slice(&self.normal);
        record[Self::TEXTURE_COORDINATES_OFFSET..Self::STRIDE_IN_FLOATS]
            .copy_from_slice(&self.texture_coordinates);
    }
}
