// Fixtures shared by the adapter tests.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::data::image::RandomResizedCrop;
use crate::infra::config::AdapterConfig;

/// Side length used by test loaders, small enough to keep tests fast
pub const TEST_IMAGE_SIZE: u32 = 8;

/// Write a small solid-colour PNG into `dir`.
pub fn write_png(dir: &Path, name: &str) {
    RgbImage::from_pixel(20, 14, Rgb([90, 120, 200]))
        .save(dir.join(name))
        .unwrap();
}

/// A seeded config whose image root is `dir` (with trailing separator).
pub fn config(dir: &Path, seed: u64) -> AdapterConfig {
    let mut cfg = AdapterConfig::new(dir.join("table.csv"))
        .with_img_root(dir.join(""))
        .with_seed(seed);
    cfg.image_size = TEST_IMAGE_SIZE;
    cfg
}

pub fn loader() -> RandomResizedCrop {
    RandomResizedCrop {
        size: TEST_IMAGE_SIZE,
        ..RandomResizedCrop::default()
    }
}
