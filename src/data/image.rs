// ============================================================
// Image Loader
// ============================================================
// Turns one image file into a training tensor:
//
//   file ──► decode (image crate) ──► RGB
//        ──► random resized crop  (area 80–100%, aspect 3/4–4/3)
//        ──► resize to size×size  (bicubic / Catmull-Rom)
//        ──► f32 in [0, 1], channel-first, trailing depth 1
//
// The crop box is chosen the usual way: up to ten attempts
// at a random area and aspect ratio that fits inside the image,
// then a centre crop clamped to the aspect range.
//
// Any failure is an ImageLoadError. Adapters treat that as
// "this image contributes nothing" and keep going.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use rand::{Rng, RngCore};

use crate::domain::sample::ImageTensor;
use crate::domain::traits::ImageLoader;
use crate::error::ImageLoadError;
use crate::infra::config::AdapterConfig;

const CROP_ATTEMPTS: usize = 10;

/// Decode, crop, resize and normalise.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomResizedCrop {
    /// Output side length
    pub size:  u32,
    /// Crop area as a fraction of the source area
    pub scale: (f32, f32),
    /// Crop aspect ratio (width / height)
    pub ratio: (f32, f32),
}

impl Default for RandomResizedCrop {
    fn default() -> Self {
        Self {
            size:  512,
            scale: (0.8, 1.0),
            ratio: (3.0 / 4.0, 4.0 / 3.0),
        }
    }
}

/// A crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x:      u32,
    pub y:      u32,
    pub width:  u32,
    pub height: u32,
}

impl RandomResizedCrop {
    pub fn from_config(config: &AdapterConfig) -> Self {
        Self {
            size: config.image_size,
            scale: (config.crop_scale[0], config.crop_scale[1]),
            ..Self::default()
        }
    }

    /// Pick the crop rectangle for a `width × height` source.
    pub fn crop_window<R: Rng + ?Sized>(&self, width: u32, height: u32, rng: &mut R) -> CropWindow {
        let area = width as f32 * height as f32;
        let (log_lo, log_hi) = (self.ratio.0.ln(), self.ratio.1.ln());

        for _ in 0..CROP_ATTEMPTS {
            let target_area = area * rng.gen_range(self.scale.0..=self.scale.1);
            let aspect = rng.gen_range(log_lo..=log_hi).exp();

            let w = (target_area * aspect).sqrt().round() as u32;
            let h = (target_area / aspect).sqrt().round() as u32;

            if w > 0 && h > 0 && w <= width && h <= height {
                return CropWindow {
                    x:      rng.gen_range(0..=width - w),
                    y:      rng.gen_range(0..=height - h),
                    width:  w,
                    height: h,
                };
            }
        }

        // Fallback: centre crop, clamped to the aspect range
        let in_ratio = width as f32 / height as f32;
        let (w, h) = if in_ratio < self.ratio.0 {
            (width, ((width as f32 / self.ratio.0).round() as u32).clamp(1, height))
        } else if in_ratio > self.ratio.1 {
            (((height as f32 * self.ratio.1).round() as u32).clamp(1, width), height)
        } else {
            (width, height)
        };
        CropWindow {
            x:      (width - w) / 2,
            y:      (height - h) / 2,
            width:  w,
            height: h,
        }
    }
}

impl ImageLoader for RandomResizedCrop {
    fn load(&self, path: &Path, rng: &mut dyn RngCore) -> Result<ImageTensor, ImageLoadError> {
        let rgb = image::open(path)
            .map_err(|source| ImageLoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageLoadError::Empty {
                path: path.to_path_buf(),
            });
        }

        let window = self.crop_window(width, height, rng);
        let cropped = imageops::crop_imm(&rgb, window.x, window.y, window.width, window.height).to_image();
        let resized = imageops::resize(&cropped, self.size, self.size, FilterType::CatmullRom);

        Ok(to_tensor(&resized))
    }
}

/// RGB pixels → planar f32 in [0, 1].
pub fn to_tensor(image: &RgbImage) -> ImageTensor {
    let (width, height) = image.dimensions();
    let plane = width as usize * height as usize;
    let mut data = vec![0.0f32; 3 * plane];

    for (x, y, pixel) in image.enumerate_pixels() {
        let offset = y as usize * width as usize + x as usize;
        for c in 0..3 {
            data[c * plane + offset] = f32::from(pixel[c]) / 255.0;
        }
    }

    ImageTensor::from_planar(data, 3, height as usize, width as usize)
}

/// `[3, size, size, 1]`, the shape every adapter image must have.
pub fn image_shape(size: u32) -> [usize; 4] {
    [3, size as usize, size as usize, 1]
}

/// `root` and `name` concatenated as text, the way MedPix tables
/// expect: a root of ".../MPX_" and a name of "a.png" give
/// ".../MPX_a.png". A directory root needs its trailing separator.
pub fn image_path(root: &Path, name: &str) -> PathBuf {
    let mut full = root.as_os_str().to_os_string();
    full.push(name);
    PathBuf::from(full)
}

/// Load one image, logging and swallowing the failure.
/// A tensor of any shape other than `expected` is a failure too,
/// so every sample image can be batched together.
pub(crate) fn try_load<L: ImageLoader + ?Sized>(
    loader:   &L,
    path:     &Path,
    expected: [usize; 4],
    rng:      &mut dyn RngCore,
) -> Option<ImageTensor> {
    let loaded = loader.load(path, rng).and_then(|tensor| {
        if tensor.shape() == expected {
            Ok(tensor)
        } else {
            Err(ImageLoadError::Shape {
                path: path.to_path_buf(),
                expected,
                actual: tensor.shape(),
            })
        }
    });
    match loaded {
        Ok(tensor) => Some(tensor),
        Err(e) => {
            tracing::debug!("Skipping image: {}", e);
            None
        }
    }
}
