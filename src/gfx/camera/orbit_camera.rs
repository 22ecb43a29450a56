use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::camera_utils::CameraUniform;
use super::{Camera, OrbitController, OrbitControllerOptions};
use crate::gfx::scene::{transform::matrix_translation, Node, Transform};
use crate::input::InputSurface;

/// A ready-made camera node orbiting the origin.
///
/// The node carries a [`Transform`], a [`Camera`] sized to the surface and an
/// [`OrbitController`].
#[derive(Debug)]
pub struct OrbitCamera {
    node: Node,
    controller: OrbitController,
}

impl OrbitCamera {
    pub fn new(surface: &InputSurface) -> Self {
        Self::with_options(surface, OrbitControllerOptions::default())
    }

    pub fn with_options(surface: &InputSurface, options: OrbitControllerOptions) -> Self {
        let (width, height) = surface.size();
        let mut camera = Camera::default();
        camera.resize(width, height);

        let controller = OrbitController::new(surface, options);
        let node = Node::new()
            .with_component(Transform::default())
            .with_component(camera)
            .with_component(controller.clone());

        let mut rig = Self { node, controller };
        rig.update();
        rig
    }

    pub fn update(&mut self) {
        self.controller.update(&mut self.node);
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn camera(&self) -> &Camera {
        rig_camera(&self.node)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        rig_camera_mut(&mut self.node).resize(width, height);
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        rig_matrix(&self.node)
    }

    pub fn position(&self) -> Vector3<f32> {
        matrix_translation(&self.matrix())
    }

    pub fn view(&self) -> Matrix4<f32> {
        rig_view(&self.node)
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.camera().projection_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::new(self.view(), self.projection(), self.position())
    }

    pub fn dispose(&self) {
        self.controller.dispose();
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Releases the node; the controller stays active for as long as the node
    /// keeps its component.
    pub fn into_node(self) -> Node {
        self.node
    }
}

pub(crate) fn rig_matrix(node: &Node) -> Matrix4<f32> {
    node.component::<Transform>()
        .map(Transform::matrix)
        .unwrap_or_else(Matrix4::identity)
}

pub(crate) fn rig_view(node: &Node) -> Matrix4<f32> {
    rig_matrix(node).invert().unwrap_or_else(|| {
        log::warn!("camera transform is not invertible, using identity view");
        Matrix4::identity()
    })
}

// Rigs never hand out their node mutably, so the camera is always there.
pub(crate) fn rig_camera(node: &Node) -> &Camera {
    node.component::<Camera>()
        .expect("camera rig node always carries a camera")
}

pub(crate) fn rig_camera_mut(node: &mut Node) -> &mut Camera {
    node.component_mut::<Camera>()
        .expect("camera rig node always carries a camera")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn test_camera_is_sized_to_surface() {
        let surface = InputSurface::new(800, 400);
        let rig = OrbitCamera::new(&surface);
        assert_eq!(rig.camera().aspect(), 2.0);
        assert_eq!(rig.camera().half_y(), 200.0);
    }

    #[test]
    fn test_starts_at_orbit_distance() {
        let surface = InputSurface::new(800, 600);
        let rig = OrbitCamera::new(&surface);

        assert!((rig.position() - Vector3::new(0.0, 0.0, 2.0)).magnitude() < 1e-6);
        let origin_in_view = rig.view() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin_in_view - Vector4::new(0.0, 0.0, -2.0, 1.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_update_follows_input() {
        let surface = InputSurface::new(800, 600);
        let mut rig = OrbitCamera::new(&surface);

        surface.dispatch(InputEvent::Wheel { delta_y: 500.0 });
        rig.update();
        assert!((rig.position().magnitude() - 2.0 * 1.0f32.exp()).abs() < 1e-4);

        let uniform = rig.uniform();
        assert_eq!(uniform.position[3], 1.0);
        let projection: [[f32; 4]; 4] = rig.projection().into();
        assert_eq!(uniform.projection, projection);
    }

    #[test]
    fn test_dispose_and_into_node() {
        let surface = InputSurface::new(800, 600);
        let rig = OrbitCamera::new(&surface);
        rig.dispose();
        assert_eq!(surface.listener_count(), 0);

        let node = rig.into_node();
        assert!(node.has_component::<Camera>());
        assert!(node.has_component::<OrbitController>());
    }
}
