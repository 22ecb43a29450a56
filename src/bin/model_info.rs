//! Prints what the framework sees in a model file and optionally uploads it to the GPU.
//!
//! ```text
//! model-info models/bunny.json --upload
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gpu_workshop::gfx::camera::{CameraUniform, OrbitCamera};
use gpu_workshop::gfx::geometry::Model;
use gpu_workshop::input::InputSurface;
use gpu_workshop::loader::{Loader, DEFAULT_ASSETS_PATH};
use gpu_workshop::wgpu_utils::UniformBuffer;

#[derive(Parser, Debug)]
#[command(about = "Inspect an OBJ, PLY or JSON model")]
struct Args {
    /// Model path, relative to the assets directory
    path: PathBuf,

    /// Directory model paths are resolved against
    #[arg(long, default_value = DEFAULT_ASSETS_PATH)]
    assets: PathBuf,

    /// Keep the model's own coordinates instead of fitting it into a unit cube
    #[arg(long)]
    no_normalize: bool,

    /// Upload vertex, index and camera buffers to a GPU device
    #[arg(long)]
    upload: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let loader = Loader::new(&args.assets);
    let data = loader
        .load_model(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    let model = Model::new(data, !args.no_normalize).context("building the mesh")?;

    let bounds = model.mesh().bounds();
    println!("vertices:  {}", model.num_vertices());
    println!("indices:   {}", model.num_indices());
    println!("bounds:    min {:?} max {:?}", bounds.min(), bounds.max());
    println!("center:    {:?}", bounds.center());
    println!("diagonal:  {:?}", bounds.diagonal());
    println!(
        "buffers:   {} vertex bytes, {} index bytes",
        model.vertex_buffer_size(),
        model.index_buffer_size()
    );
    let matrix: [[f32; 4]; 4] = model.model_matrix().into();
    println!("model matrix (columns):");
    for column in matrix {
        println!("  {column:?}");
    }

    if args.upload {
        pollster::block_on(upload(&model))?;
    }
    Ok(())
}

async fn upload(model: &Model) -> Result<()> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
        .context("no compatible GPU adapter")?;
    log::info!("using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("model-info device"),
            required_features: wgpu::Features::default(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to request a device")?;

    let vertex_buffer = model.create_vertex_buffer(&device)?;
    let index_buffer = model.create_index_buffer(&device)?;

    let surface = InputSurface::new(800, 600);
    let mut camera = OrbitCamera::new(&surface);
    let mut camera_buffer = UniformBuffer::new_with_data(&device, &CameraUniform::default());
    camera.update();
    camera_buffer.update_content(&queue, camera.uniform());
    camera.dispose();

    queue.submit(None);
    println!(
        "uploaded {} + {} + {} bytes",
        vertex_buffer.size(),
        index_buffer.size(),
        camera_buffer.buffer().size()
    );
    Ok(())
}
