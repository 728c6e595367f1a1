use thiserror::Error;

/// Failure taxonomy for one pipeline invocation.
///
/// The `Display` strings are exactly what the result envelope surfaces to
/// the host, so they are part of the external contract. Segmentation and
/// compositing failures share one surfaced message; the variants stay
/// distinct for logging.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The frame carried no decodable pixel data.
    #[error("no image buffer")]
    NoImageBuffer,

    /// The caller did not supply a frame index.
    #[error("missing frame index")]
    MissingFrameIndex,

    /// The segmentation collaborator produced no mask.
    #[error("Failed to process image")]
    SegmentationUnavailable,

    /// Masking, cropping, resizing, or rasterization failed.
    #[error("Failed to process image")]
    Compositing,

    /// Anything else that went wrong during orchestration.
    #[error("Error processing image: {0}")]
    Unexpected(String),
}
