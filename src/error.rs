use crate::geometry::Rectangle;
use thiserror::Error;

/// Recoverable errors reported back to the user for a single command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutoutError {
    #[error("rectangle {rect} covers no pixels of the {width}x{height} image")]
    InvalidRectangle {
        rect: Rectangle,
        width: u32,
        height: u32,
    },

    #[error("no rectangle selected; press 'r' to select a rectangle first")]
    SegmentationUnavailable,
}
