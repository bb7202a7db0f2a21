// ============================================================
// Image Placement
// ============================================================
// Decides where a sample's images sit relative to the question.
// The decision is made once per sample and applied to every
// image in it, so a sample never mixes leading and trailing
// images.
//
// AtEnd resolves against the final question (after any history
// prefix or yes/no substitution), counted in characters.

use rand::Rng;

use crate::domain::sample::{ImagePosition, ImageRef, ImageTensor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    AtStart,
    AtEnd,
}

impl Anchor {
    /// Character offset into `question` for this anchor.
    pub fn offset(self, question: &str) -> usize {
        match self {
            Self::AtStart => 0,
            Self::AtEnd => question.chars().count(),
        }
    }

    /// Attach every image at this anchor, keeping the given order.
    pub fn place(self, question: &str, images: Vec<ImageTensor>) -> Vec<ImageRef> {
        let position = ImagePosition {
            question: self.offset(question),
        };
        images
            .into_iter()
            .map(|image| ImageRef { image, position })
            .collect()
    }
}

/// Fair coin flip between leading and trailing images.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePlacementPolicy;

impl ImagePlacementPolicy {
    pub fn decide_anchor<R: Rng + ?Sized>(rng: &mut R) -> Anchor {
        if rng.gen_bool(0.5) {
            Anchor::AtEnd
        } else {
            Anchor::AtStart
        }
    }
}
