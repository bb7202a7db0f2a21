// ============================================================
// Prompt Catalog
// ============================================================
// A catalog maps a task-type tag to an ordered list of question
// templates. Each adapter family has its own catalog:
//
//   single — caption, modality, plane, modality_yes_no, plane_yes_no
//   multi  — txFollowup, ddx, dxHow, diagnosis, findings, exam,
//            discussion
//
// Yes/no buckets carry an `{object}` slot that is filled with
// either the true attribute value or a wrong one.
//
// Catalog JSON layout:
//   { "family": "single", "buckets": { "caption": ["..."], ... } }

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Placeholder replaced by `fill_object`
pub const OBJECT_SLOT: &str = "{object}";

/// Suffix appended to an attribute tag to name its yes/no bucket
pub const YES_NO_SUFFIX: &str = "_yes_no";

const SINGLE_JSON: &str = include_str!("../../resources/prompts/single.json");
const MULTI_JSON: &str = include_str!("../../resources/prompts/multi.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCatalog {
    family:  String,
    buckets: BTreeMap<String, Vec<String>>,
}

impl PromptCatalog {
    /// The built-in catalog for single-image records.
    pub fn single() -> Result<Self, DatasetError> {
        Self::from_json_str(SINGLE_JSON, "resources/prompts/single.json")
    }

    /// The built-in catalog for multi-image records.
    pub fn multi() -> Result<Self, DatasetError> {
        Self::from_json_str(MULTI_JSON, "resources/prompts/multi.json")
    }

    /// Read and validate a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let json = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, &path.display().to_string())
    }

    /// The catalog at `path` when one is configured, otherwise `builtin`.
    pub fn from_file_or(
        path:    Option<&Path>,
        builtin: impl FnOnce() -> Result<Self, DatasetError>,
    ) -> Result<Self, DatasetError> {
        match path {
            Some(path) => Self::from_file(path),
            None => builtin(),
        }
    }

    /// Parse and validate a catalog. `origin` only labels errors.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, DatasetError> {
        let catalog: Self = serde_json::from_str(json).map_err(|source| DatasetError::Json {
            origin: origin.to_string(),
            source,
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalog in memory, with the same validation as a file.
    pub fn from_buckets(
        family:  impl Into<String>,
        buckets: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, DatasetError> {
        let catalog = Self {
            family: family.into(),
            buckets,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn contains(&self, task_type: &str) -> bool {
        self.buckets.contains_key(task_type)
    }

    /// Bucket names in sorted order
    pub fn task_types(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// All templates for a task type.
    pub fn templates_for(&self, task_type: &str) -> Result<&[String], DatasetError> {
        self.buckets
            .get(task_type)
            .map(Vec::as_slice)
            .ok_or_else(|| DatasetError::UnknownTaskType {
                family:    self.family.clone(),
                task_type: task_type.to_string(),
            })
    }

    /// Draw one template uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, task_type: &str, rng: &mut R) -> Result<&str, DatasetError> {
        self.templates_for(task_type)?
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| DatasetError::EmptyBucket(task_type.to_string()))
    }

    /// Substitute `value` into the `{object}` slot of `template`.
    pub fn fill_object(template: &str, value: &str) -> Result<String, DatasetError> {
        if !template.contains(OBJECT_SLOT) {
            return Err(DatasetError::TemplateMismatch {
                template: template.to_string(),
            });
        }
        Ok(template.replace(OBJECT_SLOT, value))
    }

    /// Every bucket needs at least one template and every yes/no
    /// template needs its slot, otherwise sampling fails mid-epoch.
    fn validate(&self) -> Result<(), DatasetError> {
        for (task_type, templates) in &self.buckets {
            if templates.is_empty() {
                return Err(DatasetError::EmptyBucket(task_type.clone()));
            }
            if task_type.ends_with(YES_NO_SUFFIX) {
                if let Some(template) = templates.iter().find(|t| !t.contains(OBJECT_SLOT)) {
                    return Err(DatasetError::TemplateMismatch {
                        template: template.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_builtin_catalogs_load() {
        let single = PromptCatalog::single().unwrap();
        assert_eq!(single.family(), "single");
        for tag in ["caption", "modality", "plane", "modality_yes_no", "plane_yes_no"] {
            assert!(single.contains(tag), "missing bucket {tag}");
        }

        let multi = PromptCatalog::multi().unwrap();
        assert_eq!(multi.family(), "multi");
        for tag in ["txFollowup", "ddx", "dxHow", "diagnosis", "findings", "exam", "discussion"] {
            assert!(multi.contains(tag), "missing bucket {tag}");
        }
    }

    #[test]
    fn test_unknown_task_type() {
        let catalog = PromptCatalog::single().unwrap();
        let err = catalog.templates_for("ddx").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::UnknownTaskType { ref task_type, .. } if task_type == "ddx"
        ));
    }

    #[test]
    fn test_choose_draws_from_bucket() {
        let catalog = PromptCatalog::multi().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let bucket = catalog.templates_for("exam").unwrap();
        for _ in 0..50 {
            let t = catalog.choose("exam", &mut rng).unwrap();
            assert!(bucket.iter().any(|b| b == t));
        }
    }

    #[test]
    fn test_fill_object() {
        let filled = PromptCatalog::fill_object("Is this image in {object}?", "CT - noncontrast").unwrap();
        assert_eq!(filled, "Is this image in CT - noncontrast?");
    }

    #[test]
    fn test_fill_object_without_slot() {
        let err = PromptCatalog::fill_object("Describe the position.", "Axial").unwrap_err();
        assert!(matches!(err, DatasetError::TemplateMismatch { .. }));
    }

    #[test]
    fn test_yes_no_bucket_requires_slot() {
        let mut buckets = BTreeMap::new();
        buckets.insert("plane_yes_no".to_string(), vec!["Is it axial?".to_string()]);
        let err = PromptCatalog::from_buckets("single", buckets).unwrap_err();
        assert!(matches!(err, DatasetError::TemplateMismatch { .. }));
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let json = r#"{ "family": "multi", "buckets": { "ddx": [] } }"#;
        let err = PromptCatalog::from_json_str(json, "inline").unwrap_err();
        assert!(matches!(err, DatasetError::EmptyBucket(ref b) if b == "ddx"));
    }

    #[test]
    fn test_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{ "family": "multi", "buckets": { "ddx": ["What is the diagnosis?"] } }"#,
        )
        .unwrap();
        let catalog = PromptCatalog::from_file_or(Some(&path), PromptCatalog::multi).unwrap();
        assert_eq!(catalog.task_types().collect::<Vec<_>>(), vec!["ddx"]);

        let builtin = PromptCatalog::from_file_or(None, PromptCatalog::multi).unwrap();
        assert!(builtin.contains("findings"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = PromptCatalog::from_json_str("{ not json", "inline").unwrap_err();
        assert!(matches!(err, DatasetError::Json { .. }));
    }
}
