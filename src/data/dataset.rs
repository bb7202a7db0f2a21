// ============================================================
// MedPix Dataset
// ============================================================
// The three adapters behind one Burn `Dataset<Sample>`, so a
// training loop can pick the table family from config alone.
//
// `Dataset::get` cannot return an error. Out-of-range indices
// become `None` quietly; any other failure is logged at warn
// level before the `None`.

use std::fmt;

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::multi::MultiRecordAdapter;
use crate::data::qa::QaRecordAdapter;
use crate::data::single::SingleRecordAdapter;
use crate::domain::sample::Sample;
use crate::error::DatasetError;
use crate::infra::config::AdapterConfig;

/// Which table family a dataset reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Single,
    Multi,
    Qa,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Single => "single",
            DatasetKind::Multi => "multi",
            DatasetKind::Qa => "qa",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub enum MedPixDataset {
    Single(SingleRecordAdapter),
    Multi(MultiRecordAdapter),
    Qa(QaRecordAdapter),
}

impl MedPixDataset {
    /// Read the configured table and build the adapter for `kind`.
    pub fn from_config(kind: DatasetKind, config: &AdapterConfig) -> Result<Self, DatasetError> {
        Ok(match kind {
            DatasetKind::Single => MedPixDataset::Single(SingleRecordAdapter::from_config(config)?),
            DatasetKind::Multi => MedPixDataset::Multi(MultiRecordAdapter::from_config(config)?),
            DatasetKind::Qa => MedPixDataset::Qa(QaRecordAdapter::from_config(config)?),
        })
    }

    pub fn kind(&self) -> DatasetKind {
        match self {
            MedPixDataset::Single(_) => DatasetKind::Single,
            MedPixDataset::Multi(_) => DatasetKind::Multi,
            MedPixDataset::Qa(_) => DatasetKind::Qa,
        }
    }

    pub fn fetch(&self, index: usize) -> Result<Sample, DatasetError> {
        match self {
            MedPixDataset::Single(a) => a.fetch(index),
            MedPixDataset::Multi(a) => a.fetch(index),
            MedPixDataset::Qa(a) => a.fetch(index),
        }
    }
}

impl Dataset<Sample> for MedPixDataset {
    fn get(&self, index: usize) -> Option<Sample> {
        match self {
            MedPixDataset::Single(a) => a.get(index),
            MedPixDataset::Multi(a) => a.get(index),
            MedPixDataset::Qa(a) => a.get(index),
        }
    }

    fn len(&self) -> usize {
        match self {
            MedPixDataset::Single(a) => a.len(),
            MedPixDataset::Multi(a) => a.len(),
            MedPixDataset::Qa(a) => a.len(),
        }
    }
}

/// Collapse a fetch result into what `Dataset::get` returns.
pub(crate) fn sample_or_none(index: usize, result: Result<Sample, DatasetError>) -> Option<Sample> {
    match result {
        Ok(sample) => Some(sample),
        Err(DatasetError::IndexOutOfRange { .. }) => None,
        Err(e) => {
            tracing::warn!("Sample {} could not be built: {}", index, e);
            None
        }
    }
}
