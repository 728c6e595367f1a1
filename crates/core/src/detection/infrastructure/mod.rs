pub mod blob_detector;
