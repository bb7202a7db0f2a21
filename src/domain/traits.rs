// ============================================================
// Domain — Core Traits
// ============================================================
// The adapters never talk to the filesystem directly. They go
// through two seams:
//
//   RecordSource — produces the table rows
//                  (CsvRecordSource reads a CSV file)
//   ImageLoader  — turns an image path into a tensor
//                  (RandomResizedCrop decodes, crops and resizes)
//
// Tests and callers can plug in their own implementations.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use rand::RngCore;

use crate::domain::sample::ImageTensor;
use crate::error::{DatasetError, ImageLoadError};

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Anything that can produce every row of a table at once.
pub trait RecordSource<T> {
    fn load_all(&self) -> Result<Vec<T>, DatasetError>;
}

// ─── ImageLoader ──────────────────────────────────────────────────────────────
/// Decodes and transforms one image file.
///
/// The random generator drives any stochastic augmentation so
/// that a seeded adapter reproduces the same crops.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path, rng: &mut dyn RngCore) -> Result<ImageTensor, ImageLoadError>;
}
