//! # Transform Component
//!
//! Translation, rotation and scale of a scene node, convertible to and from a
//! 4x4 model matrix.

use cgmath::{InnerSpace, Matrix3, Matrix4, One, Quaternion, Vector3, Vector4, Zero};

/// A transform containing a position, rotation, and scale.
///
/// The matrix form is composed as `T * R * S`: a point is scaled first, then
/// rotated, then translated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Unit quaternion
    pub rotation: Quaternion<f32>,
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Quaternion::one(),
            translation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(rotation: Quaternion<f32>, translation: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            rotation,
            translation,
            scale,
        }
    }

    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Decomposes `matrix` into a new transform. See [`Transform::set_matrix`].
    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        let mut transform = Self::default();
        transform.set_matrix(matrix);
        transform
    }

    /// Composes the model matrix `T * R * S`.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Replaces rotation, translation and scale with the decomposition of `matrix`.
    ///
    /// The matrix is assumed to be a pure translate-rotate-scale composition.
    /// Shear is lost and a negative determinant is not detected: scale comes out
    /// as the (positive) length of each basis column.
    pub fn set_matrix(&mut self, matrix: Matrix4<f32>) {
        self.translation = matrix.w.truncate();

        let columns = [matrix.x.truncate(), matrix.y.truncate(), matrix.z.truncate()];
        let scale = columns.map(|column| column.magnitude());
        self.scale = Vector3::new(scale[0], scale[1], scale[2]);

        // A zero scale leaves its basis column unusable; keep it unnormalized
        // rather than dividing by zero.
        let [x, y, z] = [0, 1, 2].map(|i| {
            if scale[i] > 0.0 {
                columns[i] / scale[i]
            } else {
                columns[i]
            }
        });
        self.rotation = Quaternion::from(Matrix3::from_cols(x, y, z)).normalize();
    }

    /// Applies the full transform to a point.
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        (self.matrix() * point.extend(1.0)).truncate()
    }
}

impl From<Matrix4<f32>> for Transform {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self::from_matrix(matrix)
    }
}

impl From<Transform> for Matrix4<f32> {
    fn from(transform: Transform) -> Self {
        transform.matrix()
    }
}

/// Homogeneous translation column of a matrix, dropped to three components.
pub fn matrix_translation(matrix: &Matrix4<f32>) -> Vector3<f32> {
    let Vector4 { x, y, z, .. } = matrix.w;
    Vector3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3};
    use rand::Rng;

    const EPSILON: f32 = 1e-4;

    fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < EPSILON, "{a:?} != {b:?}");
    }

    /// q and -q describe the same rotation
    fn assert_rotation_close(a: Quaternion<f32>, b: Quaternion<f32>) {
        assert!(a.dot(b).abs() > 1.0 - EPSILON, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Transform::default().matrix(), Matrix4::one());
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let transform = Transform::new(
            Quaternion::from_angle_z(Deg(90.0)),
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 2.0),
        );

        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (10,2,0)
        let moved = transform.transform_point(Vector3::new(1.0, 0.0, 0.0));
        assert_vec_close(moved, Vector3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_matrix_round_trip() {
        let original = Transform::new(
            Quaternion::from_axis_angle(Vector3::new(1.0, 2.0, 3.0).normalize(), Deg(37.0)),
            Vector3::new(-4.0, 0.5, 12.0),
            Vector3::new(3.0, 3.0, 3.0),
        );

        let restored = Transform::from_matrix(original.matrix());

        assert_rotation_close(restored.rotation, original.rotation);
        assert_vec_close(restored.translation, original.translation);
        assert_vec_close(restored.scale, original.scale);
    }

    #[test]
    fn test_random_round_trips() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let axis = Vector3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0f32),
            );
            if axis.magnitude() < 0.1 {
                continue;
            }
            let scale = rng.random_range(0.1..10.0f32);
            let original = Transform::new(
                Quaternion::from_axis_angle(axis.normalize(), Deg(rng.random_range(-180.0..180.0f32))),
                Vector3::new(
                    rng.random_range(-50.0..50.0),
                    rng.random_range(-50.0..50.0),
                    rng.random_range(-50.0..50.0),
                ),
                Vector3::new(scale, scale, scale),
            );

            let mut restored = Transform::default();
            restored.set_matrix(original.matrix());

            assert_rotation_close(restored.rotation, original.rotation);
            assert!((restored.translation - original.translation).magnitude() < 1e-3);
            assert!((restored.scale - original.scale).magnitude() < 1e-3);
        }
    }

    #[test]
    fn test_zero_scale_does_not_produce_nan() {
        let matrix = Matrix4::from_nonuniform_scale(0.0, 1.0, 1.0);
        let transform = Transform::from_matrix(matrix);
        assert_eq!(transform.scale.x, 0.0);
        assert!(!transform.rotation.s.is_nan());
    }

    #[test]
    fn test_matrix_translation_reads_last_column() {
        let matrix = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(matrix_translation(&matrix), Vector3::new(1.0, 2.0, 3.0));
    }
}
