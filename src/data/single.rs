// ============================================================
// Single-Image Adapter
// ============================================================
// One table row → one sample with at most one image.
//
// Task types:
//   modality / plane  — half the time a direct question whose
//                       answer is the stored value; otherwise a
//                       yes/no question:
//                         true branch:  "Is this image in CT?" → yes
//                         false branch: "Is this image in MR?" → no
//   anything else     — direct question, answer = stored context
//
// The table is downsampled: length is ceil(rows / ratio) and
// index i draws a random row from block i, so repeated fetches
// of one index may return different rows.

use std::path::PathBuf;
use std::sync::Mutex;

use burn::data::dataset::Dataset;
use rand::rngs::StdRng;
use rand::{Rng, RngCore};

use crate::data::dataset::sample_or_none;
use crate::data::image::{image_path, image_shape, try_load, RandomResizedCrop};
use crate::data::loader::{retain_known_task_types, CsvRecordSource};
use crate::data::sampler::{downsample_index, downsampled_len, fork_rng};
use crate::domain::record::SingleCaseRecord;
use crate::domain::sample::Sample;
use crate::domain::traits::{ImageLoader, RecordSource};
use crate::error::DatasetError;
use crate::infra::config::AdapterConfig;
use crate::prompts::catalog::PromptCatalog;
use crate::prompts::placement::ImagePlacementPolicy;
use crate::prompts::vocabulary::{AttributeClass, AttributeVocabulary};
use crate::prompts::{NO, YES};

pub struct SingleRecordAdapter<L = RandomResizedCrop, R = StdRng> {
    records:           Vec<SingleCaseRecord>,
    catalog:           PromptCatalog,
    vocabulary:        AttributeVocabulary,
    img_root:          PathBuf,
    image_shape:       [usize; 4],
    down_sample_ratio: usize,
    loader:            L,
    rng:               Mutex<R>,
}

impl SingleRecordAdapter {
    /// Read the CSV named in the config and build the adapter
    /// with the default image loader and a config-seeded generator.
    pub fn from_config(config: &AdapterConfig) -> Result<Self, DatasetError> {
        let records = CsvRecordSource::new(&config.csv_path).load_all()?;
        Self::new(records, config, RandomResizedCrop::from_config(config), config.rng())
    }
}

impl<L: ImageLoader, R: RngCore + Send> SingleRecordAdapter<L, R> {
    pub fn new(
        records: Vec<SingleCaseRecord>,
        config:  &AdapterConfig,
        loader:  L,
        rng:     R,
    ) -> Result<Self, DatasetError> {
        config.validate()?;

        let catalog = PromptCatalog::from_file_or(config.prompt_catalog.as_deref(), PromptCatalog::single)?;
        let vocabulary = match config.vocabulary.as_deref() {
            Some(path) => AttributeVocabulary::from_file(path)?,
            None => AttributeVocabulary::canonical()?,
        };

        // An attribute bucket without its yes/no twin would fail half its fetches
        for class in [AttributeClass::Modality, AttributeClass::Plane] {
            if catalog.contains(class.as_str()) {
                catalog.templates_for(&class.yes_no_bucket())?;
            }
        }

        let records = retain_known_task_types(records, &catalog, config.unknown_type_policy)?;

        tracing::info!(
            "Single-image adapter: {} rows, 1 in {} sampled → {} samples",
            records.len(),
            config.down_sample_ratio,
            downsampled_len(records.len(), config.down_sample_ratio)
        );

        Ok(Self {
            records,
            catalog,
            vocabulary,
            img_root: config.img_root.clone(),
            image_shape: image_shape(config.image_size),
            down_sample_ratio: config.down_sample_ratio,
            loader,
            rng: Mutex::new(rng),
        })
    }

    /// Number of samples per epoch: `ceil(rows / down_sample_ratio)`
    pub fn count(&self) -> usize {
        downsampled_len(self.records.len(), self.down_sample_ratio)
    }

    pub fn records(&self) -> &[SingleCaseRecord] {
        &self.records
    }

    pub fn fetch(&self, index: usize) -> Result<Sample, DatasetError> {
        let out_of_range = || DatasetError::IndexOutOfRange {
            index,
            len: self.count(),
        };
        if index >= self.count() {
            return Err(out_of_range());
        }

        let mut rng = fork_rng(&self.rng);
        let row = downsample_index(index, self.down_sample_ratio, self.records.len(), &mut rng)
            .ok_or_else(out_of_range)?;
        let record = &self.records[row];

        let (question, answer) = self.frame(record, &mut rng)?;

        let anchor = ImagePlacementPolicy::decide_anchor(&mut rng);
        let path = image_path(&self.img_root, &record.name);
        let images = try_load(&self.loader, &path, self.image_shape, &mut rng)
            .into_iter()
            .collect();

        tracing::debug!("Sample {} ← row {} ({})", index, row, record.task_type);
        Ok(Sample::new(anchor.place(&question, images), question, answer))
    }

    /// Pick the question wording and the matching answer.
    fn frame(&self, record: &SingleCaseRecord, rng: &mut StdRng) -> Result<(String, String), DatasetError> {
        let direct = |rng: &mut StdRng| -> Result<(String, String), DatasetError> {
            let question = self.catalog.choose(&record.task_type, rng)?;
            Ok((question.to_string(), record.context.clone()))
        };

        let Some(attribute) = AttributeClass::from_task_type(&record.task_type) else {
            return direct(rng);
        };
        if rng.gen_bool(0.5) {
            return direct(rng);
        }

        let template = self.catalog.choose(&attribute.yes_no_bucket(), rng)?;
        if rng.gen_bool(0.5) {
            let question = PromptCatalog::fill_object(template, &record.context)?;
            Ok((question, YES.to_string()))
        } else {
            let wrong = self.vocabulary.sample_wrong(attribute, &record.context, rng)?;
            let question = PromptCatalog::fill_object(template, wrong)?;
            Ok((question, NO.to_string()))
        }
    }
}

impl<L: ImageLoader, R: RngCore + Send> Dataset<Sample> for SingleRecordAdapter<L, R> {
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
    use crate::data::test_support::{config, loader, write_png, TEST_IMAGE_SIZE};
    use crate::infra::config::UnknownTypePolicy;
    use rand::SeedableRng;
    use std::fs;

    fn record(name: &str, task_type: &str, context: &str) -> SingleCaseRecord {
        SingleCaseRecord {
            name:      name.into(),
            task_type: task_type.into(),
            context:   context.into(),
        }
    }

    fn adapter(dir: &std::path::Path, records: Vec<SingleCaseRecord>, seed: u64) -> SingleRecordAdapter {
        SingleRecordAdapter::new(records, &config(dir, seed), loader(), StdRng::seed_from_u64(seed)).unwrap()
    }

    /// The value substituted into a yes/no template, if `question` came from one.
    fn filled_values<'a>(templates: &'a [String], question: &'a str) -> Vec<&'a str> {
        templates
            .iter()
            .filter_map(|t| {
                let (pre, post) = t.split_once("{object}")?;
                question.strip_prefix(pre)?.strip_suffix(post)
            })
            .collect()
    }

    #[test]
    fn test_count_is_downsampled() {
        let dir = tempfile::tempdir().unwrap();
        let rows = (0..23).map(|i| record(&format!("{i}.png"), "caption", "c")).collect();
        assert_eq!(adapter(dir.path(), rows, 1).count(), 5);
    }

    #[test]
    fn test_ratio_one_keeps_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path(), 1);
        cfg.down_sample_ratio = 1;
        let rows = (0..23).map(|i| record(&format!("{i}.png"), "caption", "c")).collect();
        let a = SingleRecordAdapter::new(rows, &cfg, loader(), StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.count(), 23);
        assert_eq!(a.len(), 23);
    }

    #[test]
    fn test_caption_sample_with_image() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "scan.png");
        let a = adapter(dir.path(), vec![record("scan.png", "caption", "Axial CT of the head")], 3);
        let caption_bucket = PromptCatalog::single().unwrap().templates_for("caption").unwrap().to_vec();

        for _ in 0..10 {
            let s = a.fetch(0).unwrap();
            assert_eq!(s.answer, "Axial CT of the head");
            assert!(caption_bucket.contains(&s.question));
            assert_eq!(s.image_count(), 1);
            assert_eq!(s.image_dict[0].image.shape(), [3, TEST_IMAGE_SIZE as usize, TEST_IMAGE_SIZE as usize, 1]);
            let anchor = s.anchor().unwrap();
            assert!(anchor == 0 || anchor == s.question.chars().count());
        }
    }

    #[test]
    fn test_missing_image_gives_empty_image_dict() {
        let dir = tempfile::tempdir().unwrap();
        let a = adapter(dir.path(), vec![record("absent.png", "caption", "Chest film")], 4);
        let s = a.fetch(0).unwrap();
        assert!(s.image_dict.is_empty());
        assert_eq!(s.answer, "Chest film");
        assert!(!s.question.is_empty());
    }

    #[test]
    fn test_yes_no_branches() {
        let dir = tempfile::tempdir().unwrap();
        let truth = "CT - noncontrast";
        let a = adapter(dir.path(), vec![record("absent.png", "modality", truth)], 5);

        let catalog = PromptCatalog::single().unwrap();
        let direct = catalog.templates_for("modality").unwrap();
        let yes_no = catalog.templates_for("modality_yes_no").unwrap();
        let vocab = AttributeVocabulary::canonical().unwrap();
        let modalities = vocab.values(AttributeClass::Modality);

        let (mut n_direct, mut n_yes, mut n_no) = (0, 0, 0);
        for _ in 0..300 {
            let s = a.fetch(0).unwrap();
            match s.answer.as_str() {
                "yes" => {
                    n_yes += 1;
                    assert!(filled_values(yes_no, &s.question).contains(&truth), "{}", s.question);
                }
                "no" => {
                    n_no += 1;
                    let values = filled_values(yes_no, &s.question);
                    assert!(
                        values.iter().any(|v| *v != truth && modalities.iter().any(|m| m == v)),
                        "{}",
                        s.question
                    );
                }
                answer => {
                    n_direct += 1;
                    assert_eq!(answer, truth);
                    assert!(direct.contains(&s.question));
                }
            }
        }
        assert!(n_direct > 0 && n_yes > 0 && n_no > 0, "{n_direct}/{n_yes}/{n_no}");
    }

    #[test]
    fn test_out_of_range_index() {
        let dir = tempfile::tempdir().unwrap();
        let a = adapter(dir.path(), vec![record("a.png", "plane", "Axial")], 6);
        assert!(matches!(a.fetch(1), Err(DatasetError::IndexOutOfRange { index: 1, len: 1 })));
        assert!(a.get(1).is_none());
    }

    #[test]
    fn test_same_seed_same_samples() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        let rows: Vec<_> = (0..12)
            .map(|i| record("a.png", if i % 2 == 0 { "plane" } else { "modality" }, "Axial"))
            .collect();
        let a = adapter(dir.path(), rows.clone(), 42);
        let b = adapter(dir.path(), rows, 42);
        for i in 0..a.count() {
            assert_eq!(a.fetch(i).unwrap(), b.fetch(i).unwrap());
        }
    }

    #[test]
    fn test_unknown_type_rejected_or_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![record("a.png", "caption", "c"), record("b.png", "ddx", "d")];

        let err = SingleRecordAdapter::new(rows.clone(), &config(dir.path(), 1), loader(), StdRng::seed_from_u64(1))
            .err()
            .unwrap();
        assert!(matches!(err, DatasetError::UnknownTaskType { .. }));

        let mut cfg = config(dir.path(), 1);
        cfg.unknown_type_policy = UnknownTypePolicy::Skip;
        let a = SingleRecordAdapter::new(rows, &cfg, loader(), StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.records().len(), 1);
    }

    #[test]
    fn test_img_root_is_a_name_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "MPX_a.png");
        let mut cfg = config(dir.path(), 9);
        cfg.img_root = dir.path().join("MPX_");
        let a = SingleRecordAdapter::new(vec![record("a.png", "caption", "c")], &cfg, loader(), StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a.fetch(0).unwrap().image_count(), 1);
    }

    #[test]
    fn test_single_value_vocabulary_rejected() {
        // With one plane listed, a "no" question could only name the true plane
        let dir = tempfile::tempdir().unwrap();
        let vocab = dir.path().join("vocab.json");
        fs::write(&vocab, r#"{ "modality": ["CT"], "plane": ["Axial"] }"#).unwrap();
        let mut cfg = config(dir.path(), 10);
        cfg.vocabulary = Some(vocab);
        let err = SingleRecordAdapter::new(vec![record("a.png", "plane", "Axial")], &cfg, loader(), StdRng::seed_from_u64(10))
            .err()
            .unwrap();
        assert!(matches!(err, DatasetError::SparseVocabulary(_)));
    }

    #[test]
    fn test_no_answer_never_names_true_value() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = dir.path().join("vocab.json");
        fs::write(&vocab, r#"{ "modality": ["CT", "MR"], "plane": ["Axial", "Coronal"] }"#).unwrap();
        let mut cfg = config(dir.path(), 11);
        cfg.vocabulary = Some(vocab);
        let a = SingleRecordAdapter::new(vec![record("a.png", "plane", "Axial")], &cfg, loader(), StdRng::seed_from_u64(11))
            .unwrap();
        let yes_no = PromptCatalog::single().unwrap().templates_for("plane_yes_no").unwrap().to_vec();

        let mut n_no = 0;
        for _ in 0..200 {
            let s = a.fetch(0).unwrap();
            if s.answer == "no" {
                n_no += 1;
                let values = filled_values(&yes_no, &s.question);
                assert!(values.contains(&"Coronal"), "{}", s.question);
                assert!(!values.contains(&"Axial"), "{}", s.question);
            }
        }
        assert!(n_no > 0);
    }

    #[test]
    fn test_from_config_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "MPX1_synpic1.png");
        fs::write(
            dir.path().join("table.csv"),
            "name,type,context\nMPX1_synpic1.png,plane,Axial\nMPX1_synpic1.png,caption,Head CT\n",
        )
        .unwrap();
        let a = SingleRecordAdapter::from_config(&config(dir.path(), 8)).unwrap();
        assert_eq!(a.count(), 1);
        let s = a.get(0).unwrap();
        assert!(s.image_count() <= 1);
    }
}
