// ============================================================
// Data Pipeline
// ============================================================
// Everything from a MedPix CSV table to Burn tensor batches.
//
//   CSV table
//       │
//       ▼
//   CsvRecordSource   → typed rows, required columns checked
//       │
//       ▼
//   Adapter           → single / multi / qa; picks prompts,
//       │               cleans text, loads and anchors images
//       ▼
//   MedPixDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   SampleBatcher     → stacks images into one tensor
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads CSV tables into typed records
pub mod loader;

/// Decodes, crops and resizes images
pub mod image;

/// Text cleanup and history/explanation concatenation
pub mod preprocessor;

/// Row down-sampling, image capping, per-fetch RNG
pub mod sampler;

/// One image per row with attribute yes/no questions
pub mod single;

/// Many images per row, findings cleanup
pub mod multi;

/// Question/answer rows with optional explanations
pub mod qa;

/// Burn Dataset wrapper over the three adapters
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

#[cfg(test)]
mod test_support;
