use std::path::Path;

use crate::shared::composite_image::CompositeImage;

/// Writes one composited image to a file, losslessly.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, image: &CompositeImage) -> Result<(), Box<dyn std::error::Error>>;
}
