// ============================================================
// Domain — Table Records
// ============================================================
// One struct per CSV shape. Each row is read once at adapter
// construction and never modified afterwards.
//
//   single: name, type, context
//   multi:  name, type, context, history
//   qa:     name, question, answer, explanation
//
// Extra columns in the file are ignored. Empty cells in the
// optional columns (history, explanation) read as None.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A row type that can be read from a MedPix table.
pub trait TableRecord: DeserializeOwned {
    /// Header names that must be present in the file.
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// The task-type tag used to pick a prompt bucket,
    /// or None for shapes that carry their own question.
    fn task_type(&self) -> Option<&str>;
}

/// One image with a task tag, e.g. a modality or a caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleCaseRecord {
    /// Image file name relative to the image root
    pub name: String,

    #[serde(rename = "type")]
    pub task_type: String,

    /// Ground-truth text: the modality, the plane or a caption
    pub context: String,
}

impl TableRecord for SingleCaseRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["name", "type", "context"];

    fn task_type(&self) -> Option<&str> {
        Some(&self.task_type)
    }
}

/// One case with several images and a diagnostic task tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiCaseRecord {
    /// Comma-separated image file names
    pub name: String,

    #[serde(rename = "type")]
    pub task_type: String,

    pub context: String,

    /// Patient history, sometimes prepended to the question
    #[serde(default)]
    pub history: Option<String>,
}

impl MultiCaseRecord {
    /// The individual image names, trimmed, with empty segments dropped.
    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.name
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
    }
}

impl TableRecord for MultiCaseRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["name", "type", "context", "history"];

    fn task_type(&self) -> Option<&str> {
        Some(&self.task_type)
    }
}

/// A free-form question with its answer and explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub name: String,
    pub question: String,
    pub answer: String,

    #[serde(default)]
    pub explanation: Option<String>,
}

impl TableRecord for QaRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["name", "question", "answer", "explanation"];

    fn task_type(&self) -> Option<&str> {
        None
    }
}
