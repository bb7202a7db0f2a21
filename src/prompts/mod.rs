// ============================================================
// Prompts Layer
// ============================================================
// Everything that decides the wording of a sample:
//
//   catalog.rs     — task type → list of question templates,
//                    `{object}` substitution for yes/no forms
//   vocabulary.rs  — closed modality / plane lists used to
//                    draw a wrong value for "no" samples
//   placement.rs   — one coin flip per sample deciding whether
//                    the images go before or after the question
//
// The catalogs and vocabularies are data, embedded from
// `resources/` and replaceable through the adapter config.

pub mod catalog;
pub mod placement;
pub mod vocabulary;

/// Literal answer of a true yes/no sample
pub const YES: &str = "yes";

/// Literal answer of a false yes/no sample
pub const NO: &str = "no";
