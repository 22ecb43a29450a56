use cgmath::{Matrix4, Rad};

/// Construction parameters of a [`Camera`].
///
/// `near` and `far` default by projection kind: `0..1` for orthographic
/// cameras, `1..inf` for perspective ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDescriptor {
    pub orthographic: bool,
    /// Width over height
    pub aspect: f32,
    /// Vertical field of view, perspective only
    pub fov_y: Rad<f32>,
    /// Top bound of the view volume, orthographic only
    pub half_y: f32,
    pub near: Option<f32>,
    pub far: Option<f32>,
}

impl Default for CameraDescriptor {
    fn default() -> Self {
        Self {
            orthographic: false,
            aspect: 1.0,
            fov_y: Rad(1.0),
            half_y: 1.0,
            near: None,
            far: None,
        }
    }
}

/// A perspective or orthographic projection with zero-to-one depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    orthographic: bool,
    aspect: f32,
    fov_y: Rad<f32>,
    half_y: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraDescriptor::default())
    }
}

impl Camera {
    pub fn new(descriptor: CameraDescriptor) -> Self {
        let CameraDescriptor {
            orthographic,
            aspect,
            fov_y,
            half_y,
            near,
            far,
        } = descriptor;

        Self {
            orthographic,
            aspect,
            fov_y,
            half_y,
            near: near.unwrap_or(if orthographic { 0.0 } else { 1.0 }),
            far: far.unwrap_or(if orthographic { 1.0 } else { f32::INFINITY }),
        }
    }

    /// A perspective camera; pass `f32::INFINITY` as `far` for an infinite far plane.
    pub fn perspective(fov_y: impl Into<Rad<f32>>, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(CameraDescriptor {
            orthographic: false,
            aspect,
            fov_y: fov_y.into(),
            near: Some(near),
            far: Some(far),
            ..Default::default()
        })
    }

    pub fn orthographic(half_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(CameraDescriptor {
            orthographic: true,
            aspect,
            half_y,
            near: Some(near),
            far: Some(far),
            ..Default::default()
        })
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        if self.orthographic {
            self.orthographic_matrix()
        } else {
            self.perspective_matrix()
        }
    }

    /// Right-handed perspective projection looking down `-z`, mapping
    /// `near..far` to depth `0..1`.
    pub fn perspective_matrix(&self) -> Matrix4<f32> {
        let f = 1.0 / (self.fov_y.0 / 2.0).tan();
        let (m22, m32) = if self.far.is_finite() {
            let nf = 1.0 / (self.near - self.far);
            (self.far * nf, self.far * self.near * nf)
        } else {
            (-1.0, -self.near)
        };

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            f / self.aspect, 0.0, 0.0,  0.0,
            0.0,             f,   0.0,  0.0,
            0.0,             0.0, m22, -1.0,
            0.0,             0.0, m32,  0.0,
        );
        matrix
    }

    /// Box of half height `half_y` and half width `half_y * aspect`, mapping
    /// `near..far` to depth `0..1`.
    pub fn orthographic_matrix(&self) -> Matrix4<f32> {
        let half_x = self.half_y * self.aspect;
        let (left, right) = (-half_x, half_x);
        let (bottom, top) = (-self.half_y, self.half_y);

        let lr = 1.0 / (left - right);
        let bt = 1.0 / (bottom - top);
        let nf = 1.0 / (self.near - self.far);

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            -2.0 * lr,             0.0,                   0.0,             0.0,
            0.0,                  -2.0 * bt,              0.0,             0.0,
            0.0,                   0.0,                   nf,              0.0,
            (left + right) * lr,   (top + bottom) * bt,   self.near * nf,  1.0,
        );
        matrix
    }

    /// Fits the camera to a surface of `width` x `height` pixels.
    ///
    /// The aspect becomes `width / height` and the orthographic half height
    /// becomes `height / 2`, so one world unit is one pixel for orthographic
    /// cameras. Zero-sized surfaces (e.g. minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring camera resize to {width}x{height}");
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.half_y = height as f32 / 2.0;
    }

    pub fn is_orthographic(&self) -> bool {
        self.orthographic
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> Rad<f32> {
        self.fov_y
    }

    pub fn half_y(&self) -> f32 {
        self.half_y
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Vector4};

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-5, "{actual} != {expected}");
    }

    #[test]
    fn test_defaults_depend_on_projection_kind() {
        let perspective = Camera::default();
        assert_eq!(perspective.near(), 1.0);
        assert_eq!(perspective.far(), f32::INFINITY);
        assert_eq!(perspective.fov_y(), Rad(1.0));

        let orthographic = Camera::new(CameraDescriptor {
            orthographic: true,
            ..Default::default()
        });
        assert_eq!(orthographic.near(), 0.0);
        assert_eq!(orthographic.far(), 1.0);
    }

    #[test]
    fn test_finite_perspective_matrix() {
        let camera = Camera::perspective(Rad(1.0f32), 1.0, 1.0, 100.0);
        let m = camera.projection_matrix();
        let f = 1.0 / 0.5f32.tan();

        assert_close(m.x.x, f);
        assert_close(m.y.y, f);
        assert_close(m.z.z, -100.0 / 99.0);
        assert_close(m.z.w, -1.0);
        assert_close(m.w.z, -100.0 / 99.0);
        assert_close(m.w.w, 0.0);
        assert_close(m.x.y + m.x.z + m.x.w + m.y.x + m.y.z + m.y.w + m.z.x + m.z.y, 0.0);
    }

    #[test]
    fn test_perspective_depth_range_is_zero_to_one() {
        let camera = Camera::perspective(Deg(60.0f32), 16.0 / 9.0, 0.5, 50.0);
        let m = camera.projection_matrix();

        let near = m * Vector4::new(0.0, 0.0, -0.5, 1.0);
        let far = m * Vector4::new(0.0, 0.0, -50.0, 1.0);
        assert_close(near.z / near.w, 0.0);
        assert_close(far.z / far.w, 1.0);
    }

    #[test]
    fn test_infinite_perspective_matrix() {
        let camera = Camera::perspective(Rad(1.0f32), 2.0, 0.1, f32::INFINITY);
        let m = camera.perspective_matrix();

        assert_close(m.x.x, 1.0 / 0.5f32.tan() / 2.0);
        assert_eq!(m.z.z, -1.0);
        assert_eq!(m.w.z, -0.1);
        assert!(m.x.x.is_finite() && m.w.z.is_finite());
    }

    #[test]
    fn test_orthographic_matrix() {
        let camera = Camera::orthographic(2.0, 1.5, 0.0, 10.0);
        let m = camera.projection_matrix();

        let corner = m * Vector4::new(3.0, 2.0, 0.0, 1.0);
        assert_close(corner.x, 1.0);
        assert_close(corner.y, 1.0);
        assert_close(corner.z, 0.0);

        let back = m * Vector4::new(0.0, 0.0, -10.0, 1.0);
        assert_close(back.z, 1.0);
    }

    #[test]
    fn test_resize_uses_pixels() {
        let mut camera = Camera::default();
        camera.resize(800, 400);
        assert_eq!(camera.aspect(), 2.0);
        assert_eq!(camera.half_y(), 200.0);

        camera.resize(0, 400);
        assert_eq!(camera.aspect(), 2.0);
    }
}
