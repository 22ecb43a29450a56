use std::path::Path;

use crate::gfx::geometry::Model;

use super::{LoadError, Loader};

/// Where the workshop keeps its sample assets.
pub const DEFAULT_ASSETS_PATH: &str = "assets";

/// The textured sample models shipped with the workshop assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestAsset {
    Barrel,
    Bunny,
    Crate,
    Lamp,
    Phone,
    Radio,
    Statue,
    Vase,
}

impl TestAsset {
    pub const ALL: [TestAsset; 8] = [
        TestAsset::Barrel,
        TestAsset::Bunny,
        TestAsset::Crate,
        TestAsset::Lamp,
        TestAsset::Phone,
        TestAsset::Radio,
        TestAsset::Statue,
        TestAsset::Vase,
    ];

    /// Model path relative to the assets directory.
    pub fn model_path(self) -> &'static str {
        match self {
            TestAsset::Barrel => "models/barrel.json",
            TestAsset::Bunny => "models/bunny.json",
            TestAsset::Crate => "models/crate.json",
            TestAsset::Lamp => "models/lamp.json",
            TestAsset::Phone => "models/phone.json",
            TestAsset::Radio => "models/radio.json",
            TestAsset::Statue => "models/statue.json",
            TestAsset::Vase => "models/vase.json",
        }
    }

    /// Texture path relative to the assets directory.
    pub fn image_path(self) -> &'static str {
        match self {
            TestAsset::Barrel => "images/barrel.webp",
            // the bunny has no texture of its own
            TestAsset::Bunny => "images/brick.png",
            TestAsset::Crate => "images/crate.webp",
            TestAsset::Lamp => "images/lamp.webp",
            TestAsset::Phone => "images/phone.webp",
            TestAsset::Radio => "images/radio.webp",
            TestAsset::Statue => "images/statue.webp",
            TestAsset::Vase => "images/vase.webp",
        }
    }
}

/// A sample model together with its decoded texture.
#[derive(Debug)]
pub struct TestModel {
    pub model: Model,
    pub image: image::RgbaImage,
}

pub fn load_test_model(
    assets_path: impl AsRef<Path>,
    asset: TestAsset,
    scale_to_unit_cube_and_center: bool,
) -> Result<TestModel, LoadError> {
    let loader = Loader::new(assets_path.as_ref());
    let data = loader.load_model(asset.model_path())?;

    Ok(TestModel {
        model: Model::new(data, scale_to_unit_cube_and_center)?,
        image: loader.load_image(asset.image_path())?,
    })
}

pub fn load_barrel(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Barrel, scale_to_unit_cube_and_center)
}

pub fn load_bunny(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Bunny, scale_to_unit_cube_and_center)
}

pub fn load_crate(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Crate, scale_to_unit_cube_and_center)
}

pub fn load_lamp(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Lamp, scale_to_unit_cube_and_center)
}

pub fn load_phone(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Phone, scale_to_unit_cube_and_center)
}

pub fn load_radio(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Radio, scale_to_unit_cube_and_center)
}

pub fn load_statue(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Statue, scale_to_unit_cube_and_center)
}

pub fn load_vase(assets_path: impl AsRef<Path>, scale_to_unit_cube_and_center: bool) -> Result<TestModel, LoadError> {
    load_test_model(assets_path, TestAsset::Vase, scale_to_unit_cube_and_center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::scratch_dir;
    use cgmath::{Matrix4, SquareMatrix};
    use std::collections::HashSet;

    fn write_crate_assets(dir: &Path) {
        std::fs::create_dir_all(dir.join("models")).unwrap();
        std::fs::create_dir_all(dir.join("images")).unwrap();
        std::fs::write(
            dir.join("models/crate.json"),
            r#"{"positions": [0, 0, 0, 4, 0, 0, 0, 2, 0], "texcoords": [0, 0, 1, 0, 0, 1], "indices": [0, 1, 2]}"#,
        )
        .unwrap();
        image::RgbaImage::new(4, 4)
            .save_with_format(dir.join("images/crate.webp"), image::ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_every_asset_has_distinct_files() {
        let models: HashSet<_> = TestAsset::ALL.iter().map(|asset| asset.model_path()).collect();
        assert_eq!(models.len(), TestAsset::ALL.len());

        let images: HashSet<_> = TestAsset::ALL.iter().map(|asset| asset.image_path()).collect();
        assert_eq!(images.len(), TestAsset::ALL.len());
    }

    #[test]
    fn test_load_crate() {
        let dir = scratch_dir("crate");
        write_crate_assets(&dir);

        let normalized = load_crate(&dir, true).unwrap();
        assert_eq!(normalized.model.num_vertices(), 3);
        assert_eq!(normalized.image.dimensions(), (4, 4));
        assert_eq!(normalized.model.transform().scale.x, 0.25);

        let raw = load_crate(&dir, false).unwrap();
        assert_eq!(raw.model.model_matrix(), Matrix4::identity());

        assert!(matches!(load_barrel(&dir, true), Err(LoadError::Io { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
