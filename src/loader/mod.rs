//! # Resource Loading
//!
//! [`Loader`] reads text, images, WGSL shaders and mesh files relative to a
//! base directory. Loads are synchronous: each call returns once the resource
//! is fully read and decoded.
//!
//! Supported model formats, chosen by file extension (case-insensitive):
//!
//! - `obj` - Wavefront OBJ, see [`parse_obj`]
//! - `ply` - ASCII PLY with a fixed vertex layout, see [`parse_ply`]
//! - `json` - a serialized [`MeshData`]
//!
//! ```no_run
//! use gpu_workshop::gfx::geometry::Model;
//! use gpu_workshop::loader::Loader;
//!
//! let loader = Loader::new("assets");
//! let model = Model::new(loader.load_model("models/bunny.json")?, true)?;
//! let texture = loader.load_image("images/brick.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod obj;
pub mod ply;
pub mod test_models;

pub use obj::parse_obj;
pub use ply::{parse_ply, PlyError};
pub use test_models::{
    load_barrel, load_bunny, load_crate, load_lamp, load_phone, load_radio, load_statue,
    load_test_model, load_vase, TestAsset, TestModel, DEFAULT_ASSETS_PATH,
};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::gfx::geometry::{MeshData, MeshError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unexpected model extension '{0}'")]
    UnsupportedExtension(String),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse OBJ model")]
    Obj(#[from] tobj::LoadError),
    #[error("failed to parse PLY model")]
    Ply(#[from] PlyError),
    #[error("failed to parse JSON model")]
    Json(#[from] serde_json::Error),
    #[error("failed to decode image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("model data does not form a valid mesh")]
    Mesh(#[from] MeshError),
}

/// Model file formats understood by [`Loader::load_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Obj,
    Ply,
    Json,
}

impl ModelFormat {
    /// Matches a file extension without the dot, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "obj" => Some(Self::Obj),
            "ply" => Some(Self::Ply),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .map(|extension| extension.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self::from_extension(&extension).ok_or(LoadError::UnsupportedExtension(extension))
    }

    pub fn parse(self, text: &str) -> Result<MeshData, LoadError> {
        Ok(match self {
            Self::Obj => parse_obj(text)?,
            Self::Ply => parse_ply(text)?,
            Self::Json => serde_json::from_str(text)?,
        })
    }
}

/// Loads resources relative to a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
    base_path: PathBuf,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new("./")
    }
}

impl Loader {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `path` joined onto the base path. Absolute paths are used as is.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_path.join(path)
    }

    pub fn load_text(&self, path: impl AsRef<Path>) -> Result<String, LoadError> {
        let path = self.resolve(path);
        log::debug!("loading text from {}", path.display());
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
    }

    pub fn load_bytes(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
        let path = self.resolve(path);
        log::debug!("loading bytes from {}", path.display());
        std::fs::read(&path).map_err(|source| LoadError::Io { path, source })
    }

    /// Decodes a PNG, JPEG or WebP image into RGBA8 pixels.
    pub fn load_image(&self, path: impl AsRef<Path>) -> Result<image::RgbaImage, LoadError> {
        let bytes = self.load_bytes(&path)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| LoadError::Image {
                path: self.resolve(&path),
                source,
            })?
            .to_rgba8();

        log::info!(
            "loaded {}x{} image {}",
            image.width(),
            image.height(),
            path.as_ref().display()
        );
        Ok(image)
    }

    /// Compiles a WGSL file into a shader module labelled with its path.
    pub fn load_shader_module(
        &self,
        device: &wgpu::Device,
        path: impl AsRef<Path>,
    ) -> Result<wgpu::ShaderModule, LoadError> {
        let source = self.load_text(&path)?;
        let label = path.as_ref().display().to_string();

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        }))
    }

    /// Loads mesh data, choosing the parser from the file extension.
    ///
    /// The extension is checked before the file is read.
    pub fn load_model(&self, path: impl AsRef<Path>) -> Result<MeshData, LoadError> {
        let format = ModelFormat::from_path(path.as_ref())?;
        let text = self.load_text(&path)?;
        let data = format.parse(&text)?;

        log::info!(
            "loaded {:?} model {} with {} vertices and {} triangles",
            format,
            path.as_ref().display(),
            data.vertex_count(),
            data.triangle_count()
        );
        Ok(data)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A fresh, empty directory under the system temp dir.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gpu-workshop-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_unsupported_extension_names_it() {
        let loader = Loader::default();
        let err = loader.load_model("models/cube.STL").unwrap_err();

        assert!(matches!(&err, LoadError::UnsupportedExtension(ext) if ext == "stl"));
        assert_eq!(err.to_string(), "unexpected model extension 'stl'");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(ModelFormat::from_extension("OBJ"), Some(ModelFormat::Obj));
        assert_eq!(ModelFormat::from_extension("Ply"), Some(ModelFormat::Ply));
        assert_eq!(
            ModelFormat::from_path(Path::new("bunny.json")).unwrap(),
            ModelFormat::Json
        );
        assert!(ModelFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_obj_and_ply_agree_on_topology() {
        let obj = ModelFormat::Obj
            .parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")
            .unwrap();
        let ply = ModelFormat::Ply
            .parse(
                "ply\nformat ascii 1.0\nelement vertex 3\nelement face 1\nend_header\n\
                 0 0 0 0 0 1 0 0\n1 0 0 0 0 1 1 0\n0 1 0 0 0 1 0 1\n3 0 1 2\n",
            )
            .unwrap();

        assert_eq!(obj.positions, ply.positions);
        assert_eq!(obj.indices, ply.indices);
        assert_eq!(obj.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_loads_files_relative_to_base_path() {
        let dir = scratch_dir("loader");
        std::fs::create_dir_all(dir.join("models")).unwrap();
        std::fs::write(
            dir.join("models/tri.json"),
            r#"{"positions": [0, 0, 0, 1, 0, 0, 0, 1, 0], "indices": [0, 1, 2]}"#,
        )
        .unwrap();
        std::fs::write(dir.join("hello.txt"), "hello").unwrap();

        let loader = Loader::new(&dir);
        assert_eq!(loader.load_text("hello.txt").unwrap(), "hello");
        assert_eq!(loader.load_bytes("hello.txt").unwrap(), b"hello");

        let data = loader.load_model("models/tri.json").unwrap();
        assert_eq!(data.vertex_count(), 3);
        assert!(data.normals.is_empty());

        assert!(matches!(
            loader.load_model("models/missing.obj"),
            Err(LoadError::Io { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_loads_image_as_rgba() {
        let dir = scratch_dir("image");
        image::RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 0]))
            .save(dir.join("red.png"))
            .unwrap();
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();

        let loader = Loader::new(&dir);
        let image = loader.load_image("red.png").unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);

        assert!(matches!(
            loader.load_image("broken.png"),
            Err(LoadError::Image { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
