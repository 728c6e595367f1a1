use std::path::PathBuf;

use crate::shared::composite_image::CompositeImage;

/// Schedules composited images for persistence without blocking the caller.
///
/// `save_async` returns the destination path immediately; the path is a
/// valid filesystem location the moment the caller receives it, but the
/// file's contents may not exist yet. Write failures are logged by the
/// implementation and never surfaced; the caller already has the path.
pub trait ImageSaver: Send {
    fn save_async(&self, image: CompositeImage, frame_index: u64) -> PathBuf;
}
