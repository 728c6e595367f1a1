use serde::Serialize;

use crate::pipeline::error::PipelineError;
use crate::shared::frame::Frame;

/// Input envelope for one pipeline invocation: the borrowed frame plus the
/// caller-supplied frame index that names the output file.
///
/// The index is optional at the type level because the host's argument
/// dictionary may omit it; the pipeline fails fast with a structured error
/// when it is absent.
pub struct FrameRequest<'a> {
    pub frame: &'a Frame,
    pub frame_index: Option<u64>,
}

impl<'a> FrameRequest<'a> {
    pub fn new(frame: &'a Frame, frame_index: u64) -> Self {
        Self {
            frame,
            frame_index: Some(frame_index),
        }
    }

    pub fn without_index(frame: &'a Frame) -> Self {
        Self {
            frame,
            frame_index: None,
        }
    }
}

/// What one invocation hands back to the host: exactly one variant.
///
/// Serializes to the envelope the host's scripting layer consumes:
/// `{"uri": …, "numFaces": …}` on success (the face count only when the
/// pipeline was configured to produce one), `{"error": …}` on failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineResult {
    Success {
        uri: String,
        #[serde(rename = "numFaces", skip_serializing_if = "Option::is_none")]
        num_faces: Option<usize>,
    },
    Error {
        error: String,
    },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }
}

impl From<&PipelineError> for PipelineResult {
    fn from(error: &PipelineError) -> Self {
        PipelineResult::Error {
            error: error.to_string(),
        }
    }
}
