use crate::shared::frame::Frame;
use crate::shared::orientation::Orientation;

/// One detected face: bounding box in sensor pixels plus a confidence
/// score. The pipeline consumes detections only for their count.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub confidence: f32,
}

pub type DetectionError = Box<dyn std::error::Error + Send + Sync>;

/// Completion callback for one detection request. Fires exactly once,
/// possibly on another thread.
pub type DetectionCallback = Box<dyn FnOnce(Result<Vec<Detection>, DetectionError>) + Send>;

/// Domain interface for face detection.
///
/// The collaborator is inherently asynchronous: `detect` submits one request
/// and returns; results arrive through `on_complete`. Callers that need a
/// synchronous count wrap the callback in a one-shot channel (see
/// `pipeline::face_count`).
///
/// Implementations may be stateful (e.g., tracking across frames), hence
/// `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame, orientation: Orientation, on_complete: DetectionCallback);
}
