// ============================================================
// Attribute Vocabulary
// ============================================================
// Closed value lists for the two attributes that get yes/no
// questions. A "no" sample needs a plausible wrong value, so we
// draw from the list minus the record's true value.
//
// The source tables contain free-text variants that are not in
// the canonical lists. When the true value is absent, nothing is
// excluded and the draw is over the whole list.
//
// Every list needs at least two distinct values, otherwise a
// listed true value would leave nothing wrong to draw.

use std::fmt;
use std::fs;
use std::path::Path;

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::prompts::catalog::YES_NO_SUFFIX;

const VOCABULARY_JSON: &str = include_str!("../../resources/vocabulary.json");

/// The attributes that support yes/no framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeClass {
    Modality,
    Plane,
}

impl AttributeClass {
    /// `modality` and `plane` tags map to an attribute; anything else does not.
    pub fn from_task_type(task_type: &str) -> Option<Self> {
        match task_type {
            "modality" => Some(Self::Modality),
            "plane" => Some(Self::Plane),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modality => "modality",
            Self::Plane => "plane",
        }
    }

    /// Name of the catalog bucket holding this attribute's yes/no templates
    pub fn yes_no_bucket(self) -> String {
        format!("{}{}", self.as_str(), YES_NO_SUFFIX)
    }
}

impl fmt::Display for AttributeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeVocabulary {
    modality: Vec<String>,
    plane:    Vec<String>,
}

impl AttributeVocabulary {
    /// The built-in MedPix modality and plane lists.
    pub fn canonical() -> Result<Self, DatasetError> {
        Self::from_json_str(VOCABULARY_JSON, "resources/vocabulary.json")
    }

    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let json = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, &path.display().to_string())
    }

    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, DatasetError> {
        let vocabulary: Self = serde_json::from_str(json).map_err(|source| DatasetError::Json {
            origin: origin.to_string(),
            source,
        })?;
        for class in [AttributeClass::Modality, AttributeClass::Plane] {
            let values = vocabulary.values(class);
            if values.is_empty() {
                return Err(DatasetError::EmptyVocabulary(class.to_string()));
            }
            if values.iter().collect::<HashSet<_>>().len() < 2 {
                return Err(DatasetError::SparseVocabulary(class.to_string()));
            }
        }
        Ok(vocabulary)
    }

    pub fn values(&self, class: AttributeClass) -> &[String] {
        match class {
            AttributeClass::Modality => &self.modality,
            AttributeClass::Plane => &self.plane,
        }
    }

    /// Draw a value for `class` that differs from `correct`.
    ///
    /// When `correct` is not in the list, the whole list is the pool.
    /// Errors rather than return `correct` itself.
    pub fn sample_wrong<R: Rng + ?Sized>(
        &self,
        class:   AttributeClass,
        correct: &str,
        rng:     &mut R,
    ) -> Result<&str, DatasetError> {
        let pool: Vec<&String> = self.values(class).iter().filter(|v| v.as_str() != correct).collect();
        pool.choose(rng)
            .copied()
            .map(String::as_str)
            .ok_or_else(|| DatasetError::NoWrongValue {
                class:   class.to_string(),
                correct: correct.to_string(),
            })
    }
}
