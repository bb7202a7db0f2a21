// ============================================================
// Adapter Configuration
// ============================================================
// Everything an adapter needs at construction time. The struct
// is serialisable so a dataset setup can be written to JSON and
// reloaded, e.g. alongside a training run.
//
// Example config.json:
//   {
//     "csv_path": "MedPix_single_train.csv",
//     "img_root": "/data/MedPix/images/",
//     "down_sample_ratio": 5,
//     "seed": 42
//   }
//
// Missing fields fall back to the defaults below.
//
// Reference: Rust Book §9 (Error Handling with anyhow)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Image root used by the MedPix preprocessing scripts
pub const DEFAULT_IMG_ROOT: &str = "/gpfs/home/cs/leijiayu/data/MedPix/images/";

/// What to do with a row whose task type has no prompt bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypePolicy {
    /// Fail construction with `UnknownTaskType`
    #[default]
    Reject,
    /// Drop the row and log a warning
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub csv_path:            PathBuf,
    pub img_root:            PathBuf,
    /// Single-image adapter only: keep one row in every N
    pub down_sample_ratio:   usize,
    pub max_images:          usize,
    /// Side length of the square output image
    pub image_size:          u32,
    /// Area range of the random crop, as fractions of the image
    pub crop_scale:          [f32; 2],
    pub seed:                Option<u64>,
    pub unknown_type_policy: UnknownTypePolicy,
    /// Replaces the built-in prompt catalog
    pub prompt_catalog:      Option<PathBuf>,
    /// Replaces the built-in modality / plane lists
    pub vocabulary:          Option<PathBuf>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            csv_path:            PathBuf::new(),
            img_root:            PathBuf::from(DEFAULT_IMG_ROOT),
            down_sample_ratio:   5,
            max_images:          10,
            image_size:          512,
            crop_scale:          [0.8, 1.0],
            seed:                None,
            unknown_type_policy: UnknownTypePolicy::Reject,
            prompt_catalog:      None,
            vocabulary:          None,
        }
    }
}

impl AdapterConfig {
    /// Defaults for everything except the table path.
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            ..Self::default()
        }
    }

    pub fn with_img_root(mut self, img_root: impl Into<PathBuf>) -> Self {
        self.img_root = img_root.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values that would make sampling divide by zero or
    /// ask the cropper for an impossible area.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.down_sample_ratio == 0 {
            return Err(DatasetError::InvalidConfig(
                "down_sample_ratio must be at least 1".into(),
            ));
        }
        if self.max_images == 0 {
            return Err(DatasetError::InvalidConfig("max_images must be at least 1".into()));
        }
        if self.image_size == 0 {
            return Err(DatasetError::InvalidConfig("image_size must be at least 1".into()));
        }
        let [lo, hi] = self.crop_scale;
        if !(lo > 0.0 && lo <= hi && hi <= 1.0) {
            return Err(DatasetError::InvalidConfig(format!(
                "crop_scale must satisfy 0 < lo <= hi <= 1, got [{lo}, {hi}]"
            )));
        }
        Ok(())
    }

    /// The random generator for an adapter: seeded when `seed`
    /// is set, otherwise from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved adapter config to '{}'", path.display());
        Ok(())
    }

    /// Read a config written by `save` (or by hand).
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config JSON in '{}'", path.display()))?;
        Ok(config)
    }
}
