// ============================================================
// Error Types
// ============================================================
// Three kinds of failure, matching how far each one reaches:
//
//   DatasetError    — construction-time problems (bad table,
//                     bad catalog, bad config) and lookups that
//                     cannot succeed. Returned to the caller.
//   ImageLoadError  — one image could not be decoded. The
//                     adapter drops that image and carries on.
//   ConcatError     — an optional string operand (history,
//                     explanation) is absent. The adapter keeps
//                     the base string.
//
// Reference: Rust Book §9 (Error Handling)

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("unknown task type '{task_type}' in the {family} prompt catalog")]
    UnknownTaskType { family: String, task_type: String },

    #[error("template has no {{object}} slot: \"{template}\"")]
    TemplateMismatch { template: String },

    #[error("prompt bucket '{0}' has no templates")]
    EmptyBucket(String),

    #[error("vocabulary for '{0}' is empty")]
    EmptyVocabulary(String),

    #[error("vocabulary for '{0}' needs at least two distinct values")]
    SparseVocabulary(String),

    #[error("no {class} value other than '{correct}' to put in a \"no\" question")]
    NoWrongValue { class: String, correct: String },

    #[error("cannot read table '{path}': {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("table '{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("index {index} is out of range for a dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure to turn one image reference into a tensor.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("cannot decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image '{path}' has zero width or height")]
    Empty { path: PathBuf },

    #[error("image '{path}' loaded as {actual:?}, expected {expected:?}")]
    Shape {
        path:     PathBuf,
        expected: [usize; 4],
        actual:   [usize; 4],
    },
}

/// An optional string concatenation had nothing to concatenate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatError {
    #[error("missing {0} operand")]
    Missing(&'static str),
}
