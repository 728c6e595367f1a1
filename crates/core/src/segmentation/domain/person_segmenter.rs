use crate::shared::frame::Frame;
use crate::shared::mask::Mask;
use crate::shared::orientation::Orientation;

/// Requested effort/fidelity trade-off for one segmentation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentationQuality {
    Fast,
    Balanced,
    Accurate,
}

/// Domain interface for person segmentation.
///
/// The frame is presented in the given orientation; the returned mask is
/// aligned with the oriented frame, at whatever resolution the collaborator
/// chose. `Ok(None)` means no mask was produced (no person in frame) and is
/// a normal outcome, not an error.
///
/// Implementations may be stateful (e.g., temporal smoothing), hence
/// `&mut self`.
pub trait PersonSegmenter: Send {
    fn segment(
        &mut self,
        frame: &Frame,
        orientation: Orientation,
    ) -> Result<Option<Mask>, Box<dyn std::error::Error>>;
}
