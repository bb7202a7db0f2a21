// ============================================================
// Sample Batcher
// ============================================================
// Implements Burn's Batcher trait to collate a Vec<Sample> into
// one tensor of images plus the text fields.
//
// Samples carry a varying number of images (0 to max_images),
// so images are not stacked per sample. Every image in the
// batch goes into a single tensor and two side vectors record
// which sample it came from and where it is anchored:
//
//   sample 0: 2 images      images:      [3, C, H, W, 1]
//   sample 1: 0 images  →   image_owner: [0, 0, 2]
//   sample 2: 1 image       anchors:     [0, 0, 17]
//
// The adapters only emit images of the configured square size.
// For hand-built samples, any image whose shape differs from the
// batch's first image is dropped with a warning.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::sample::Sample;

// ─── SampleBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SampleBatch<B: Backend> {
    /// Every image of the batch, shape: [images, C, H, W, 1].
    /// None when no sample in the batch has an image.
    pub images: Option<Tensor<B, 5>>,

    /// For each image, the index of its sample within the batch
    pub image_owner: Vec<usize>,

    /// For each image, its character offset into the question
    pub anchors: Vec<usize>,

    pub questions: Vec<String>,
    pub answers:   Vec<String>,
}

impl<B: Backend> SampleBatch<B> {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.image_owner.len()
    }
}

// ─── SampleBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SampleBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SampleBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<Sample, SampleBatch<B>> for SampleBatcher<B> {
    fn batch(&self, items: Vec<Sample>) -> SampleBatch<B> {
        let mut image_owner = Vec::new();
        let mut anchors = Vec::new();
        let mut flat: Vec<f32> = Vec::new();
        let mut shape: Option<[usize; 4]> = None;
        let mut questions = Vec::with_capacity(items.len());
        let mut answers = Vec::with_capacity(items.len());

        for (owner, sample) in items.into_iter().enumerate() {
            for image_ref in sample.image_dict {
                let image_shape = image_ref.image.shape();
                let expected = *shape.get_or_insert(image_shape);
                if image_shape != expected {
                    tracing::warn!(
                        "Dropping {:?} image of sample {}; batch shape is {:?}",
                        image_shape,
                        owner,
                        expected
                    );
                    continue;
                }
                image_owner.push(owner);
                anchors.push(image_ref.position.question);
                flat.extend(image_ref.image.into_vec());
            }
            questions.push(sample.question);
            answers.push(sample.answer);
        }

        // Flatten, then reshape to [images, C, H, W, D]
        let images = shape.map(|[c, h, w, d]| {
            Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
                .reshape([image_owner.len(), c, h, w, d])
        });

        SampleBatch {
            images,
            image_owner,
            anchors,
            questions,
            answers,
        }
    }
}
