// ============================================================
// Domain Layer
// ============================================================
// Plain Rust structs and traits that define what the adapters
// consume and produce.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only data types and the traits other layers implement
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Table rows for the three MedPix CSV shapes
pub mod record;

// The uniform output sample and its image tensors
pub mod sample;

// Abstractions over the table reader and the image decoder
pub mod traits;
