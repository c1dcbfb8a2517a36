use crate::geometry::Rectangle;
use image::RgbImage;
use ndarray::Array2;

/// Per-pixel classification produced by a segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Label {
    #[default]
    DefiniteBackground = 0,
    DefiniteForeground = 1,
    ProbableBackground = 2,
    ProbableForeground = 3,
}

impl Label {
    pub fn is_foreground(self) -> bool {
        matches!(self, Label::DefiniteForeground | Label::ProbableForeground)
    }
}

/// Label grid indexed `[[y, x]]`, same dimensions as the source image
pub type LabelMask = Array2<Label>;

/// Fresh grid with every pixel set to [`Label::DefiniteBackground`]
pub fn background_mask(width: u32, height: u32) -> LabelMask {
    Array2::from_elem((height as usize, width as usize), Label::DefiniteBackground)
}

/// Trait for foreground/background labeling routines
/// Allows swapping the colour-model labeler for another backend
pub trait Segmenter {
    /// Label `image` inside `rect`
    ///
    /// # Arguments
    /// * `image` - Input RGB image
    /// * `rect` - Region that may contain foreground, already clamped to the image
    /// * `iterations` - Number of model/relabel rounds
    /// * `labels` - Grid to fill; arrives set to definite background everywhere
    ///
    /// Must be pure: the same inputs always produce the same labels.
    fn segment(
        &self,
        image: &RgbImage,
        rect: &Rectangle,
        iterations: u32,
        labels: &mut LabelMask,
    );

    /// Short name for logging
    fn name(&self) -> &'static str;
}
