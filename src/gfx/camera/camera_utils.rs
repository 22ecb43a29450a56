use cgmath::{Matrix4, SquareMatrix, Vector3};

/// Camera data as laid out in a WGSL uniform buffer.
///
/// ```wgsl
/// struct Camera {
///     view: mat4x4<f32>,
///     projection: mat4x4<f32>,
///     position: vec4<f32>,
/// }
/// ```
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],

    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub position: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view: convert_matrix4_to_array(Matrix4::identity()),
            projection: convert_matrix4_to_array(Matrix4::identity()),
            position: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl CameraUniform {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>, position: Vector3<f32>) -> Self {
        Self {
            view: convert_matrix4_to_array(view),
            projection: convert_matrix4_to_array(projection),
            position: position.extend(1.0).into(),
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        Matrix4::from(self.projection) * Matrix4::from(self.view)
    }
}

/// Column-major array form of `matrix`, as WGSL reads it.
pub fn convert_matrix4_to_array(matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix.into()
}
