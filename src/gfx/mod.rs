//! # Graphics Module
//!
//! This module contains the graphics-related building blocks of the workshop
//! framework. Rendering itself is left to the individual samples; everything
//! here produces data they upload or bind.
//!
//! ## Architecture Overview
//!
//! - **Scene Management** ([`scene`]) - Node tree, component bags and transforms
//! - **Camera System** ([`camera`]) - Projections, input-driven controllers and camera rigs
//! - **Geometry** ([`geometry`]) - Interleaved vertex layout, meshes and models
//!
//! ## Usage
//!
//! ```no_run
//! use gpu_workshop::gfx::camera::OrbitCamera;
//! use gpu_workshop::gfx::geometry::Model;
//! use gpu_workshop::input::InputSurface;
//! use gpu_workshop::loader::Loader;
//!
//! # fn run(device: &wgpu::Device) -> Result<(), Box<dyn std::error::Error>> {
//! let model = Model::new(Loader::new("assets").load_model("models/bunny.json")?, true)?;
//! let vertex_buffer = model.create_vertex_buffer(device)?;
//!
//! let surface = InputSurface::new(800, 600);
//! let camera = OrbitCamera::new(&surface);
//! let uniform = camera.uniform();
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod geometry;
pub mod scene;
