mod file;

pub use file::{FileSource, LoadError};

use image::RgbImage;

/// Trait for still-image sources
pub trait ImageSource {
    /// Load the image the session will work on
    fn load(&self) -> Result<RgbImage, LoadError>;
}
