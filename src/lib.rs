// ============================================================
// medpix-dataset — crate root
// ============================================================
// Dataset adapters that turn MedPix tables into uniform
// multimodal training samples:
//
//   Sample {
//     image_dict: [ { image: [C, H, W, 1], position: { question } } ],
//     question:   "...",
//     answer:     "...",
//   }
//
// The crate is organised in layers, lowest first:
//
//   domain       — records, samples, core traits (no I/O)
//   prompts      — prompt catalogs, attribute vocabularies,
//                  image placement
//   data         — CSV loading, image decoding, text cleanup,
//                  the three adapters and the Burn batcher
//   infra        — configuration and tracing setup
//   application  — builds a dataset from a config
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

pub mod application;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;
pub mod prompts;

pub use application::open_dataset::{open_dataset, open_dataset_from_file};
pub use data::dataset::{DatasetKind, MedPixDataset};
pub use data::multi::MultiRecordAdapter;
pub use data::qa::QaRecordAdapter;
pub use data::single::SingleRecordAdapter;
pub use domain::sample::{ImagePosition, ImageRef, ImageTensor, Sample};
pub use error::{ConcatError, DatasetError, ImageLoadError};
pub use infra::config::{AdapterConfig, UnknownTypePolicy};
