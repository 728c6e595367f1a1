pub mod composite_image;
pub mod frame;
pub mod mask;
pub mod orientation;
