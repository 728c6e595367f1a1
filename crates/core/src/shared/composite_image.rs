use image::RgbaImage;

/// The composited matte output: an RGBA pixel buffer, square after the
/// pipeline's centered crop, with alpha taken from the segmentation mask.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl CompositeImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 4,
            "data length must equal width * height * 4"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Takes ownership of a finished RGBA buffer from the compositor.
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }

    /// Rebuilds an `image` crate view of the buffer, e.g. for encoding.
    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}
