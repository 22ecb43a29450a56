use cgmath::{Matrix4, Vector3};

use super::camera_utils::CameraUniform;
use super::orbit_camera::{rig_camera, rig_camera_mut, rig_matrix, rig_view};
use super::{Camera, FirstPersonController, FirstPersonControllerOptions};
use crate::gfx::scene::{transform::matrix_translation, Node, Transform};
use crate::input::InputSurface;

/// Where a first person camera is placed before any input.
pub const FIRST_PERSON_START: Vector3<f32> = Vector3::new(0.0, 0.0, 2.0);

/// A ready-made camera node walking through the scene.
#[derive(Debug)]
pub struct FirstPersonCamera {
    node: Node,
    controller: FirstPersonController,
}

impl FirstPersonCamera {
    pub fn new(surface: &InputSurface) -> Self {
        Self::with_options(surface, FirstPersonControllerOptions::default())
    }

    pub fn with_options(surface: &InputSurface, options: FirstPersonControllerOptions) -> Self {
        let (width, height) = surface.size();
        let mut camera = Camera::default();
        camera.resize(width, height);

        let controller = FirstPersonController::new(surface, options);
        let node = Node::new()
            .with_component(Transform::from_translation(FIRST_PERSON_START))
            .with_component(camera)
            .with_component(controller.clone());

        Self { node, controller }
    }

    /// Advances the controller by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.controller.update(&mut self.node, dt);
    }

    pub fn controller(&self) -> &FirstPersonController {
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

    pub fn into_node(self) -> Node {
        self.node
    }
}
