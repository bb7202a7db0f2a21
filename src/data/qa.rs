// ============================================================
// QA Adapter
// ============================================================
// One question/answer row → one sample with at most one image.
// The question is used verbatim; the answer gets the row's
// explanation appended when there is one:
//
//   answer "Benign" + explanation "no malignant features"
//     → "Benign. no malignant features"

use std::path::PathBuf;
use std::sync::Mutex;

use burn::data::dataset::Dataset;
use rand::rngs::StdRng;
use rand::RngCore;

use crate::data::dataset::sample_or_none;
use crate::data::image::{image_path, image_shape, try_load, RandomResizedCrop};
use crate::data::loader::CsvRecordSource;
use crate::data::preprocessor::append_explanation;
use crate::data::sampler::{cap_images, fork_rng};
use crate::domain::record::QaRecord;
use crate::domain::sample::{ImageTensor, Sample};
use crate::domain::traits::{ImageLoader, RecordSource};
use crate::error::DatasetError;
use crate::infra::config::AdapterConfig;
use crate::prompts::placement::ImagePlacementPolicy;

pub struct QaRecordAdapter<L = RandomResizedCrop, R = StdRng> {
    records:    Vec<QaRecord>,
    img_root:   PathBuf,
    image_shape: [usize; 4],
    max_images: usize,
    loader:     L,
    rng:        Mutex<R>,
}

impl QaRecordAdapter {
    pub fn from_config(config: &AdapterConfig) -> Result<Self, DatasetError> {
        let records = CsvRecordSource::new(&config.csv_path).load_all()?;
        Self::new(records, config, RandomResizedCrop::from_config(config), config.rng())
    }
}

impl<L: ImageLoader, R: RngCore + Send> QaRecordAdapter<L, R> {
    pub fn new(
        records: Vec<QaRecord>,
        config:  &AdapterConfig,
        loader:  L,
        rng:     R,
    ) -> Result<Self, DatasetError> {
        config.validate()?;
        tracing::info!("QA adapter: {} question/answer pairs", records.len());
        Ok(Self {
            records,
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

    pub fn records(&self) -> &[QaRecord] {
        &self.records
    }

    pub fn fetch(&self, index: usize) -> Result<Sample, DatasetError> {
        let record = self.records.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.count(),
        })?;
        let mut rng = fork_rng(&self.rng);

        let question = record.question.clone();
        let answer = append_explanation(&record.answer, record.explanation.as_deref())
            .unwrap_or_else(|_| record.answer.clone());

        let anchor = ImagePlacementPolicy::decide_anchor(&mut rng);
        let path = image_path(&self.img_root, &record.name);
        let images: Vec<ImageTensor> = try_load(&self.loader, &path, self.image_shape, &mut rng)
            .into_iter()
            .collect();
        let images = cap_images(images, self.max_images, &mut rng);

        Ok(Sample::new(anchor.place(&question, images), question, answer))
    }
}

impl<L: ImageLoader, R: RngCore + Send> Dataset<Sample> for QaRecordAdapter<L, R> {
    fn get(&self, index: usize) -> Option<Sample> {
        sample_or_none(index, self.fetch(index))
    }

    fn len(&self) -> usize {
        self.count()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{config, loader, write_png};
    use rand::SeedableRng;
    use std::fs;

    fn pair(name: &str, answer: &str, explanation: Option<&str>) -> QaRecord {
        QaRecord {
            name:        name.into(),
            question:    "Is the lesion benign or malignant?".into(),
            answer:      answer.into(),
            explanation: explanation.map(str::to_string),
        }
    }

    fn adapter(dir: &std::path::Path, records: Vec<QaRecord>) -> QaRecordAdapter {
        QaRecordAdapter::new(records, &config(dir, 1), loader(), StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_answer_with_explanation() {
        let dir = tempfile::tempdir().unwrap();
        let a = adapter(dir.path(), vec![pair("a.png", "Benign", Some("no malignant features"))]);
        assert_eq!(a.fetch(0).unwrap().answer, "Benign. no malignant features");
    }

    #[test]
    fn test_answer_without_explanation() {
        let dir = tempfile::tempdir().unwrap();
        let a = adapter(dir.path(), vec![pair("a.png", "Benign", None)]);
        assert_eq!(a.fetch(0).unwrap().answer, "Benign");
    }

    #[test]
    fn test_missing_image_keeps_text() {
        let dir = tempfile::tempdir().unwrap();
        let a = adapter(dir.path(), vec![pair("absent.png", "Benign", None)]);
        let s = a.fetch(0).unwrap();
        assert!(s.image_dict.is_empty());
        assert_eq!(s.question, "Is the lesion benign or malignant?");
        assert_eq!(s.answer, "Benign");
    }

    #[test]
    fn test_image_is_anchored() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        let a = adapter(dir.path(), vec![pair("a.png", "Benign", None)]);
        let mut offsets = std::collections::HashSet::new();
        for _ in 0..40 {
            let s = a.fetch(0).unwrap();
            assert_eq!(s.image_count(), 1);
            offsets.insert(s.anchor().unwrap());
        }
        let len = "Is the lesion benign or malignant?".chars().count();
        assert_eq!(offsets, std::collections::HashSet::from([0, len]));
    }

    #[test]
    fn test_img_root_is_a_name_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "MPX_a.png");
        let mut cfg = config(dir.path(), 1);
        cfg.img_root = dir.path().join("MPX_");
        let a = QaRecordAdapter::new(vec![pair("a.png", "Benign", None)], &cfg, loader(), StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(a.fetch(0).unwrap().image_count(), 1);
    }

    #[test]
    fn test_from_config_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("table.csv"),
            "name,question,answer,explanation\n\
             a.png,What is seen?,Cyst,thin wall\n\
             b.png,Is it normal?,No,\n",
        )
        .unwrap();
        let a = QaRecordAdapter::from_config(&config(dir.path(), 2)).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(0).unwrap().answer, "Cyst. thin wall");
        assert_eq!(a.get(1).unwrap().answer, "No");
        assert!(a.get(2).is_none());
    }
}
