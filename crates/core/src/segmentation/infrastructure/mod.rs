pub mod luma_segmenter;
