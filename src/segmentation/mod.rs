mod color_model;
pub mod types;

pub use color_model::ColorModelSegmenter;
pub use types::{background_mask, Label, LabelMask, Segmenter};

use crate::error::CutoutError;
use crate::geometry::Rectangle;
use image::RgbImage;

/// Model/relabel rounds per segmentation request
pub const SEGMENTATION_ITERATIONS: u32 = 5;

/// Create the default segmenter (colour-model labeler)
pub fn create_default_segmenter() -> Box<dyn Segmenter> {
    Box::new(ColorModelSegmenter::new())
}

/// Boundary between the session and a [`Segmenter`]
///
/// Clamps the requested rectangle to the image and hands the segmenter a
/// freshly initialised label grid on every call, so repeated requests with
/// the same inputs give identical labels.
pub struct SegmentationAdapter {
    segmenter: Box<dyn Segmenter>,
    iterations: u32,
}

impl SegmentationAdapter {
    pub fn new(segmenter: Box<dyn Segmenter>) -> Self {
        Self {
            segmenter,
            iterations: SEGMENTATION_ITERATIONS,
        }
    }

    pub fn run(&self, image: &RgbImage, rect: &Rectangle) -> Result<LabelMask, CutoutError> {
        let (width, height) = image.dimensions();
        let clamped = rect.clamp_to(width, height);
        if clamped.is_empty() {
            return Err(CutoutError::InvalidRectangle {
                rect: *rect,
                width,
                height,
            });
        }

        let _span = tracing::debug_span!("segment", segmenter = self.segmenter.name()).entered();
        tracing::debug!(
            "Segmenting {} ({}x{}) for {} iterations",
            clamped,
            clamped.width(),
            clamped.height(),
            self.iterations
        );

        let mut labels = background_mask(width, height);
        self.segmenter
            .segment(image, &clamped, self.iterations, &mut labels);
        tracing::debug!(
            "Labelled {} foreground pixels",
            labels.iter().filter(|l| l.is_foreground()).count()
        );

        Ok(labels)
    }
}
