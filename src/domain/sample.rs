// ============================================================
// Domain — Sample
// ============================================================
// The uniform output of every adapter:
//
//   image_dict: ordered images, each anchored at a character
//               offset into the question
//   question:   the prompt text
//   answer:     the target text
//
// Images are stored channel-first with a trailing depth axis:
//   [channels, height, width, 1]
// The depth axis is reserved for volumetric scans; a 2-D
// image always has depth 1.

use serde::{Deserialize, Serialize};

/// A decoded image as a flat f32 buffer plus its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTensor {
    data:  Vec<f32>,
    shape: [usize; 4],
}

impl ImageTensor {
    /// Wrap planar (channel-first) pixel data as a depth-1 tensor.
    ///
    /// # Panics
    /// Panics if `data.len() != channels * height * width`.
    pub fn from_planar(data: Vec<f32>, channels: usize, height: usize, width: usize) -> Self {
        assert_eq!(
            data.len(),
            channels * height * width,
            "planar buffer does not match {channels}x{height}x{width}"
        );
        Self {
            data,
            shape: [channels, height, width, 1],
        }
    }

    /// `[channels, height, width, depth]`
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn channels(&self) -> usize {
        self.shape[0]
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }

    pub fn depth(&self) -> usize {
        self.shape[3]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Where an image sits relative to the question text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePosition {
    /// Character offset into the question (0 or its length)
    pub question: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub image:    ImageTensor,
    pub position: ImagePosition,
}

/// One training example, identical in shape for every adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub image_dict: Vec<ImageRef>,
    pub question:   String,
    pub answer:     String,
}

impl Sample {
    pub fn new(
        image_dict: Vec<ImageRef>,
        question:   impl Into<String>,
        answer:     impl Into<String>,
    ) -> Self {
        Self {
            image_dict,
            question: question.into(),
            answer:   answer.into(),
        }
    }

    /// Number of images attached to this sample
    pub fn image_count(&self) -> usize {
        self.image_dict.len()
    }

    /// The shared anchor offset, or None when there are no images.
    pub fn anchor(&self) -> Option<usize> {
        self.image_dict.first().map(|image| image.position.question)
    }
}
