//! # Workshop Prelude
//!
//! Commonly used types of the framework in one import.
//!
//! ```rust
//! use gpu_workshop::prelude::*;
//!
//! let surface = InputSurface::new(800, 600);
//! let mut camera = OrbitCamera::new(&surface);
//! camera.update();
//!
//! let data = Loader::default()
//!     .load_model("missing.stl")
//!     .unwrap_or_else(|_| MeshData::default());
//! assert_eq!(data.vertex_count(), 0);
//! ```

// Re-export graphics and scene types
pub use crate::gfx::camera::{
    Camera, CameraDescriptor, CameraUniform, FirstPersonCamera, FirstPersonController,
    FirstPersonControllerOptions, OrbitCamera, OrbitController, OrbitControllerOptions,
};
pub use crate::gfx::geometry::{Aabb, Mesh, MeshData, MeshError, Model, Vertex};
pub use crate::gfx::scene::{Node, NodeId, SceneError, SceneGraph, Transform};

// Re-export input and loading
pub use crate::input::{EventKind, InputEvent, InputSurface, Subscription};
pub use crate::loader::{LoadError, Loader, ModelFormat};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Matrix4, Quaternion, Rad, Vector3, Zero};
