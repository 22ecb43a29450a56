//! # Scene Management Module
//!
//! This module provides the scene graph of the workshop framework: a tree of
//! nodes, each carrying a bag of typed components.
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - Arena that owns nodes and maintains the parent/child relation
//! - [`Node`] - A tree entity holding components such as a [`Transform`],
//!   a [`Camera`](crate::gfx::camera::Camera) or a controller
//! - [`Transform`] - Rotation, translation and scale convertible to a model matrix
//!
//! ## Usage
//!
//! ```no_run
//! use gpu_workshop::gfx::scene::{SceneGraph, Transform};
//! use cgmath::Vector3;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.create_node();
//! let child = graph.create_node();
//! graph.add_child(root, child).unwrap();
//!
//! if let Some(node) = graph.node_mut(child) {
//!     node.add_component(Transform::from_translation(Vector3::new(0.0, 1.0, 0.0)));
//! }
//! ```

pub mod component;
pub mod node;
pub mod transform;

// Re-export main types
pub use component::Components;
pub use node::{Node, NodeId, SceneError, SceneGraph};
pub use transform::Transform;
