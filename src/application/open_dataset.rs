// ============================================================
// Open Dataset
// ============================================================
// Builds a ready-to-index dataset from a config:
//
//   Step 1: Validate the config       (infra)
//   Step 2: Read the CSV table        (data)
//   Step 3: Build the adapter         (data + prompts)
//
// Errors are wrapped with the table path and family so a
// failing run says which file was at fault.

use std::path::Path;

use anyhow::{Context, Result};
use burn::data::dataset::Dataset;

use crate::data::dataset::{DatasetKind, MedPixDataset};
use crate::infra::config::AdapterConfig;

/// Open the `kind` dataset described by `config`.
pub fn open_dataset(kind: DatasetKind, config: &AdapterConfig) -> Result<MedPixDataset> {
    config
        .validate()
        .with_context(|| format!("Invalid {kind} adapter config"))?;

    tracing::info!("Opening {} dataset from '{}'", kind, config.csv_path.display());
    let dataset = MedPixDataset::from_config(kind, config).with_context(|| {
        format!("Cannot build {kind} dataset from '{}'", config.csv_path.display())
    })?;
    tracing::info!("{} dataset ready: {} samples per epoch", kind, dataset.len());

    Ok(dataset)
}

/// Load an `AdapterConfig` JSON file, then open the dataset.
pub fn open_dataset_from_file(kind: DatasetKind, config_path: &Path) -> Result<MedPixDataset> {
    let config = AdapterConfig::load(config_path)?;
    open_dataset(kind, &config)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_qa_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("qa.csv");
        fs::write(&csv, "name,question,answer,explanation\na.png,Is it normal?,Yes,\n").unwrap();
        let config = AdapterConfig::new(&csv).with_img_root(dir.path()).with_seed(1);

        let ds = open_dataset(DatasetKind::Qa, &config).unwrap();
        assert_eq!(ds.kind(), DatasetKind::Qa);
        assert_eq!(ds.len(), 1);
        let s = ds.get(0).unwrap();
        assert_eq!(s.question, "Is it normal?");
        assert!(s.image_dict.is_empty());
    }

    #[test]
    fn test_open_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("multi.csv");
        fs::write(&csv, "name,type,context,history\na.png,exam,Normal,\n").unwrap();
        let config_path = dir.path().join("adapter.json");
        AdapterConfig::new(&csv)
            .with_img_root(dir.path())
            .with_seed(2)
            .save(&config_path)
            .unwrap();

        let ds = open_dataset_from_file(DatasetKind::Multi, &config_path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.get(0).unwrap().answer, "Normal");
    }

    #[test]
    fn test_missing_table_mentions_path() {
        let config = AdapterConfig::new("/nonexistent/table.csv");
        let err = open_dataset(DatasetKind::Single, &config).err().unwrap();
        assert!(format!("{err:#}").contains("/nonexistent/table.csv"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AdapterConfig::new("table.csv");
        config.down_sample_ratio = 0;
        assert!(open_dataset(DatasetKind::Single, &config).is_err());
    }
}
