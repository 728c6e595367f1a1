use crate::shared::composite_image::CompositeImage;
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;

/// Domain interface for combining a frame with its segmentation mask into
/// the final matte image.
///
/// `Ok(None)` means the composition could not produce a renderable image
/// (zero-extent mask, empty intermediate); it maps to a recoverable
/// pipeline error, never a fault.
pub trait FrameCompositor: Send {
    fn composite(
        &self,
        frame: &Frame,
        mask: &Mask,
    ) -> Result<Option<CompositeImage>, Box<dyn std::error::Error>>;
}
