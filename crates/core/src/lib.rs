//! Per-frame person segmentation and matte compositing.
//!
//! One [`pipeline::frame_pipeline::FramePipeline`] invocation takes a single
//! camera frame, asks a segmentation collaborator for a person mask,
//! composites frame and mask into a square RGBA matte, optionally counts
//! faces through a detection collaborator, and schedules a background PNG
//! write, returning a structured result envelope without ever letting a
//! fault escape to the embedding host.
//!
//! The CV collaborators ([`segmentation::domain::person_segmenter::PersonSegmenter`],
//! [`detection::domain::face_detector::FaceDetector`]) are injected by the
//! embedding application; the built-in implementations are simple non-ML
//! stand-ins for demos and tests.

pub mod compositing;
pub mod detection;
pub mod persistence;
pub mod pipeline;
pub mod segmentation;
pub mod shared;
