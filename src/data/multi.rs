// ============================================================
// Multi-Image Adapter
// ============================================================
// One case row → one sample with every image of the case.
//
// Steps per fetch:
//   1. answer   = context without "• " bullets
//   2. question = random template for the task type, with the
//                 patient history in front half the time
//   3. images   = each comma-separated name loaded on its own;
//                 unreadable ones are skipped
//   4. findings answers lose their size measurements
//   5. more than max_images → uniform random subset
//   6. one anchor for all images, against the final question

use std::path::PathBuf;
use std::sync::Mutex;

use burn::data::dataset::Dataset;
use rand::rngs::StdRng;
use rand::{Rng, RngCore};

use crate::data::dataset::sample_or_none;
use crate::data::image::{image_path, image_shape, try_load, RandomResizedCrop};
use crate::data::loader::{retain_known_task_types, CsvRecordSource};
use crate::data::preprocessor::{prefix_history, strip_bullets, strip_measurements};
use crate::data::sampler::{cap_images, fork_rng};
use crate::domain::record::MultiCaseRecord;
use crate::domain::sample::{ImageTensor, Sample};
use crate::domain::traits::{ImageLoader, RecordSource};
use crate::error::DatasetError;
use crate::infra::config::AdapterConfig;
use crate::prompts::catalog::PromptCatalog;
use crate::prompts::placement::ImagePlacementPolicy;

/// Task type whose answers get measurement stripping
pub const FINDINGS: &str = "findings";

pub struct MultiRecordAdapter<L = RandomResizedCrop, R = StdRng> {
    records:    Vec<MultiCaseRecord>,
    catalog:    PromptCatalog,
    img_root:   PathBuf,
    image_shape: [usize; 4],
    max_images: usize,
    loader:     L,
    rng:        Mutex<R>,
}

impl MultiRecordAdapter {
    pub fn from_config(config: &AdapterConfig) -> Result<Self, DatasetError> {
        let records = CsvRecordSource::new(&config.csv_path).load_all()?;
        Self::new(records, config, RandomResizedCrop::from_config(config), config.rng())
    }
}

impl<L: ImageLoader, R: RngCore + Send> MultiRecordAdapter<L, R> {
    pub fn new(
        records: Vec<MultiCaseRecord>,
        config:  &AdapterConfig,
        loader:  L,
        rng:     R,
    ) -> Result<Self, DatasetError> {
        config.validate()?;
        let catalog = PromptCatalog::from_file_or(config.prompt_catalog.as_deref(), PromptCatalog::multi)?;
        let records = retain_known_task_types(records, &catalog, config.unknown_type_policy)?;

        tracing::info!(
            "Multi-image adapter: {} cases, at most {} images each",
            records.len(),
            config.max_images
        );

        Ok(Self {
            records,
            catalog,
            img_root: config.img_root.clone(),
            image_shape: image_shape(config.image_size),
            max_images: config.max_images,
            loader,
            rng: Mutex::new(rng),
        })
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[MultiCaseRecord] {
        &self.records
    }

    pub fn fetch(&self, index: usize) -> Result<Sample, DatasetError> {
        let record = self.records.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.count(),
        })?;
        let mut rng = fork_rng(&self.rng);

        let mut answer = strip_bullets(&record.context);

        let template = self.catalog.choose(&record.task_type, &mut rng)?;
        let question = if rng.gen_bool(0.5) {
            prefix_history(record.history.as_deref(), template).unwrap_or_else(|_| template.to_string())
        } else {
            template.to_string()
        };

        let anchor = ImagePlacementPolicy::decide_anchor(&mut rng);
        let images: Vec<ImageTensor> = record
            .image_names()
            .filter_map(|name| {
                try_load(&self.loader, &image_path(&self.img_root, name), self.image_shape, &mut rng)
            })
            .collect();

        if record.task_type == FINDINGS {
            answer = strip_measurements(&answer);
        }

        let loaded = images.len();
        let images = cap_images(images, self.max_images, &mut rng);
        tracing::debug!(
            "Case {} ({}): {} images loaded, {} kept",
            index,
            record.task_type,
            loaded,
            images.len()
        );

        Ok(Sample::new(anchor.place(&question, images), question, answer))
    }
}

impl<L: ImageLoader, R: RngCore + Send> Dataset<Sample> for MultiRecordAdapter<L, R> {
    fn get(&self, index: usize) -> Option<Sample> {
        sample_or_none(index, self.fetch(index))
    }

    fn len(&self) -> usize {
        self.count()
    }
}
