pub mod error;
pub mod face_count;
pub mod frame_pipeline;
pub mod pipeline_logger;
pub mod pipeline_result;
