use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Pixel, Rgba, RgbaImage, RgbImage};

use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::shared::composite_image::CompositeImage;
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;
use crate::shared::orientation::Rotation;

/// CPU mask compositor.
///
/// Per frame: rotate the sensor data by the configured quarter-turn, scale
/// the mask (independent X/Y factors) to the rotated frame's extent, cut
/// out the subject using the mask intensity as alpha, rotate back, crop a
/// centered square, and optionally resize to a fixed target.
///
/// The instance is built once per pipeline and reused for every frame; the
/// rotation must match the orientation the segmentation collaborator was
/// given, or masks will not line up with the frame.
pub struct CpuCompositor {
    rotation: Rotation,
    resize_target: Option<(u32, u32)>,
}

impl CpuCompositor {
    pub fn new(rotation: Rotation, resize_target: Option<(u32, u32)>) -> Self {
        Self {
            rotation,
            resize_target,
        }
    }
}

impl FrameCompositor for CpuCompositor {
    fn composite(
        &self,
        frame: &Frame,
        mask: &Mask,
    ) -> Result<Option<CompositeImage>, Box<dyn std::error::Error>> {
        if mask.is_empty() || frame.width() == 0 || frame.height() == 0 {
            return Ok(None);
        }
        if frame.channels() != 3 {
            return Err(format!("unsupported channel count: {}", frame.channels()).into());
        }

        let Some(sensor) =
            RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        else {
            return Ok(None);
        };
        let oriented = rotate(sensor, self.rotation);
        let (ow, oh) = oriented.dimensions();

        let Some(mask_img) = GrayImage::from_raw(mask.width(), mask.height(), mask.data().to_vec())
        else {
            return Ok(None);
        };
        // Anisotropic scale to the oriented frame's extent.
        let scaled_mask = if mask_img.dimensions() == (ow, oh) {
            mask_img
        } else {
            imageops::resize(&mask_img, ow, oh, FilterType::Triangle)
        };

        // Subject cutout: RGB from the frame, alpha from the mask intensity.
        let cutout = RgbaImage::from_fn(ow, oh, |x, y| {
            let rgb = oriented.get_pixel(x, y).0;
            let alpha = scaled_mask.get_pixel(x, y).0[0];
            Rgba([rgb[0], rgb[1], rgb[2], alpha])
        });

        let restored = rotate(cutout, self.rotation.inverse());
        let (rw, rh) = restored.dimensions();

        let side = rw.min(rh);
        if side == 0 {
            return Ok(None);
        }
        let x_offset = (rw - side) / 2;
        let y_offset = (rh - side) / 2;
        let cropped = imageops::crop_imm(&restored, x_offset, y_offset, side, side).to_image();

        let rendered = match self.resize_target {
            Some((tw, th)) if tw > 0 && th > 0 => {
                imageops::resize(&cropped, tw, th, FilterType::Triangle)
            }
            Some(_) => return Ok(None),
            None => cropped,
        };

        Ok(Some(CompositeImage::from_image(rendered)))
    }
}

fn rotate<P>(image: ImageBuffer<P, Vec<P::Subpixel>>, rotation: Rotation) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    match rotation {
        Rotation::None => image,
        Rotation::Quarter => imageops::rotate90(&image),
        Rotation::Half => imageops::rotate180(&image),
        Rotation::ThreeQuarter => imageops::rotate270(&image),
    }
}
