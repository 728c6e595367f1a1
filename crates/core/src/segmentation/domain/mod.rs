pub mod person_segmenter;
