pub mod image_saver;
pub mod image_writer;
