// src/lib.rs
//! GPU Workshop
//!
//! The reusable layer of a wgpu rendering workshop: a scene graph with typed
//! components, cameras driven by pointer and keyboard input, interleaved mesh
//! data ready for GPU buffers, and loaders for OBJ, PLY and JSON models.

pub mod gfx;
pub mod input;
pub mod loader;
pub mod prelude;
pub mod wgpu_utils;
