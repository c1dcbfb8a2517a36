use super::ImageSource;
use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source image missing or undecodable; the program cannot start without it
#[derive(Debug, Error)]
#[error("could not load image from {}", .path.display())]
pub struct LoadError {
    path: PathBuf,
    #[source]
    source: image::ImageError,
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ImageSource for FileSource {
    fn load(&self) -> Result<RgbImage, LoadError> {
        tracing::info!("Loading image from {}", self.path.display());

        let image = image::open(&self.path)
            .map_err(|source| LoadError {
                path: self.path.clone(),
                source,
            })?
            .to_rgb8();

        tracing::info!("Loaded {}x{} image", image.width(), image.height());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn loads_png_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("objects.png");
        RgbImage::from_pixel(7, 5, Rgb([9, 8, 7])).save(&path).unwrap();

        let image = FileSource::new(&path).load().unwrap();
        assert_eq!(image.dimensions(), (7, 5));
        assert_eq!(*image.get_pixel(3, 3), Rgb([9, 8, 7]));
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");

        let err = FileSource::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn garbage_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(FileSource::new(&path).load().is_err());
    }
}
