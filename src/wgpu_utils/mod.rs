//! WGPU utility functions and helpers
//!
//! Small wrappers around buffer creation shared by the mesh and camera code.

pub mod mapped_buffer;
pub mod uniform_buffer;

// Re-export main types
pub use mapped_buffer::create_mapped_buffer;
pub use uniform_buffer::UniformBuffer;
