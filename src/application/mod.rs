// ============================================================
// Application
// ============================================================
// Wires config, tables and adapters together. No text or image
// processing happens here; only workflow coordination.

// Config → MedPixDataset
pub mod open_dataset;
