use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::gfx::scene::{Node, Transform};
use crate::wgpu_utils::create_mapped_buffer;

use super::{Mesh, MeshData, MeshError, Vertex};

/// Scale factor applied by [`Model::light_source`] when none is given.
pub const DEFAULT_LIGHT_SOURCE_SCALE: f32 = 0.05;

/// The representation of a 3D model.
///
/// A model is a [`Node`] carrying a [`Mesh`] and a [`Transform`] component.
/// The node is only handed out immutably (or by value through
/// [`Model::into_node`]), so both components are always present.
#[derive(Debug)]
pub struct Model {
    node: Node,
}

impl Model {
    /// Builds the mesh from `data` and wraps it in a model.
    ///
    /// See [`Model::from_mesh`] for `scale_to_unit_cube_and_center`.
    pub fn new(data: MeshData, scale_to_unit_cube_and_center: bool) -> Result<Self, MeshError> {
        Ok(Self::from_mesh(Mesh::new(data)?, scale_to_unit_cube_and_center))
    }

    /// Wraps an existing mesh.
    ///
    /// With `scale_to_unit_cube_and_center`, the initial transform moves the
    /// bounding-box center to the origin and scales uniformly so that the
    /// longest side of the box has length 1. Otherwise it is the identity.
    pub fn from_mesh(mesh: Mesh, scale_to_unit_cube_and_center: bool) -> Self {
        let matrix = if scale_to_unit_cube_and_center {
            normalization_matrix(&mesh)
        } else {
            Matrix4::identity()
        };

        let node = Node::new()
            .with_component(mesh)
            .with_component(Transform::from_matrix(matrix));
        Self { node }
    }

    /// A normalized model shrunk by `scale_factor` around the origin, used to
    /// draw point lights.
    pub fn light_source(data: MeshData, scale_factor: f32) -> Result<Self, MeshError> {
        let mut model = Self::new(data, true)?;
        let matrix = Matrix4::from_scale(scale_factor) * model.model_matrix();
        model.transform_mut().set_matrix(matrix);
        Ok(model)
    }

    pub fn mesh(&self) -> &Mesh {
        self.node
            .component::<Mesh>()
            .expect("model node always carries a mesh")
    }

    pub fn transform(&self) -> &Transform {
        self.node
            .component::<Transform>()
            .expect("model node always carries a transform")
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        self.node
            .component_mut::<Transform>()
            .expect("model node always carries a transform")
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.transform().matrix()
    }

    pub fn num_vertices(&self) -> usize {
        self.mesh().num_vertices()
    }

    pub fn num_indices(&self) -> usize {
        self.mesh().num_indices()
    }

    pub fn vertex_buffer_size(&self) -> wgpu::BufferAddress {
        self.num_vertices() as wgpu::BufferAddress * Vertex::STRIDE
    }

    pub fn index_buffer_size(&self) -> wgpu::BufferAddress {
        self.num_indices() as wgpu::BufferAddress * Mesh::INDEX_STRIDE
    }

    pub fn index_format(&self) -> wgpu::IndexFormat {
        Mesh::INDEX_FORMAT
    }

    /// Creates a vertex buffer mapped at creation and fills it with the
    /// interleaved vertices.
    pub fn create_vertex_buffer(&self, device: &wgpu::Device) -> Result<wgpu::Buffer, MeshError> {
        create_mapped_buffer::<f32, _>(
            device,
            "Model Vertex Buffer",
            wgpu::BufferUsages::VERTEX,
            self.num_vertices() * Vertex::STRIDE_IN_FLOATS,
            |range| self.write_vertices_to_mapped_range(range),
        )
    }

    pub fn create_index_buffer(&self, device: &wgpu::Device) -> Result<wgpu::Buffer, MeshError> {
        create_mapped_buffer::<u32, _>(
            device,
            "Model Index Buffer",
            wgpu::BufferUsages::INDEX,
            self.num_indices(),
            |range| self.write_indices_to_mapped_range(range),
        )
    }

    pub fn write_vertices_to_mapped_range(&self, mapped_range: &mut [f32]) -> Result<(), MeshError> {
        self.mesh().write_vertices_to_mapped_range(mapped_range)
    }

    pub fn write_indices_to_mapped_range(&self, mapped_range: &mut [u32]) -> Result<(), MeshError> {
        self.mesh().write_indices_to_mapped_range(mapped_range)
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Releases the underlying node, e.g. to insert it into a
    /// [`SceneGraph`](crate::gfx::scene::SceneGraph).
    pub fn into_node(self) -> Node {
        self.node
    }
}

/// `S * T`: translate the box center to the origin, then scale the longest
/// side of the box to 1.
fn normalization_matrix(mesh: &Mesh) -> Matrix4<f32> {
    let bounds = mesh.bounds();
    let longest = bounds.longest_extent();
    if longest <= 0.0 {
        log::warn!("mesh has a degenerate bounding box, skipping normalization scale");
        return Matrix4::from_translation(-bounds.center());
    }

    let scale_factor = 1.0 / longest;
    let translation: Vector3<f32> = -bounds.center();
    Matrix4::from_scale(scale_factor) * Matrix4::from_translation(translation)
}
