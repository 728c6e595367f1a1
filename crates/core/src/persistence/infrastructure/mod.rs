pub mod background_saver;
pub mod png_writer;
pub mod retention;
