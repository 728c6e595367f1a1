use std::path::Path;

use crate::persistence::domain::image_writer::ImageWriter;
use crate::shared::composite_image::CompositeImage;

/// Writes a composited image as PNG using the `image` crate.
pub struct PngImageWriter;

impl PngImageWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngImageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for PngImageWriter {
    fn write(&self, path: &Path, image: &CompositeImage) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image
            .to_image()
            .ok_or("Failed to create image from composite data")?;
        img.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_image(width: u32, height: u32, rgba: [u8; 4]) -> CompositeImage {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgba);
        }
        CompositeImage::new(data, width, height)
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let writer = PngImageWriter::new();
        writer.write(&path, &make_image(32, 32, [50, 100, 200, 255])).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let writer = PngImageWriter::new();
        writer.write(&path, &make_image(8, 8, [50, 100, 200, 128])).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 8);
        assert_eq!(img.height(), 8);
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200, 128]);
    }

    #[test]
    fn test_write_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        let writer = PngImageWriter::new();
        writer.write(&path, &make_image(4, 4, [1, 2, 3, 4])).unwrap();
        assert!(path.exists());
    }
}
