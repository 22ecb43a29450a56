//! # Cameras
//!
//! [`Camera`] holds a projection. The controllers turn [`InputSurface`]
//! events into a pose written to a node's [`Transform`], and the rigs bundle
//! node, camera and controller into one object.
//!
//! [`InputSurface`]: crate::input::InputSurface
//! [`Transform`]: crate::gfx::scene::Transform
//!
//! ```rust
//! use gpu_workshop::gfx::camera::OrbitCamera;
//! use gpu_workshop::input::InputSurface;
//!
//! let surface = InputSurface::new(800, 600);
//! let mut camera = OrbitCamera::new(&surface);
//! camera.update();
//! let uniform = camera.uniform();
//! # let _ = uniform;
//! ```

pub mod camera;
pub mod camera_utils;
pub mod first_person_camera;
pub mod first_person_controller;
pub mod orbit_camera;
pub mod orbit_controller;

// Re-export main types
pub use camera::{Camera, CameraDescriptor};
pub use camera_utils::{convert_matrix4_to_array, CameraUniform};
pub use first_person_camera::FirstPersonCamera;
pub use first_person_controller::{FirstPersonController, FirstPersonControllerOptions};
pub use orbit_camera::OrbitCamera;
pub use orbit_controller::{OrbitController, OrbitControllerOptions};
