use crate::segmentation::domain::person_segmenter::{PersonSegmenter, SegmentationQuality};
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;
use crate::shared::orientation::{Orientation, Rotation};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Luminance-threshold segmenter: a non-ML stand-in collaborator for demos
/// and tests. Pixels whose BT.601 luma reaches the threshold are foreground.
///
/// The quality hint selects the mask resolution relative to the oriented
/// frame (Accurate = full, Balanced = 1/2, Fast = 1/4), so lower quality
/// also exercises the compositor's mask-rescale path.
pub struct LumaSegmenter {
    threshold: u8,
    quality: SegmentationQuality,
}

impl LumaSegmenter {
    pub fn new(threshold: u8, quality: SegmentationQuality) -> Self {
        Self { threshold, quality }
    }

    fn downsample_factor(&self) -> u32 {
        match self.quality {
            SegmentationQuality::Accurate => 1,
            SegmentationQuality::Balanced => 2,
            SegmentationQuality::Fast => 4,
        }
    }
}

impl Default for LumaSegmenter {
    fn default() -> Self {
        Self::new(96, SegmentationQuality::Balanced)
    }
}

impl PersonSegmenter for LumaSegmenter {
    fn segment(
        &mut self,
        frame: &Frame,
        orientation: Orientation,
    ) -> Result<Option<Mask>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(None);
        }
        if frame.channels() != 3 {
            return Err(format!("unsupported channel count: {}", frame.channels()).into());
        }

        let rotation = orientation.rotation();
        let (ow, oh) = if rotation.swaps_axes() {
            (frame.height(), frame.width())
        } else {
            (frame.width(), frame.height())
        };

        let factor = self.downsample_factor();
        let mw = (ow / factor).max(1);
        let mh = (oh / factor).max(1);

        let pixels = frame.as_ndarray();
        let mut data = Vec::with_capacity((mw * mh) as usize);
        let mut any_foreground = false;

        for my in 0..mh {
            for mx in 0..mw {
                let ox = (mx * factor).min(ow - 1);
                let oy = (my * factor).min(oh - 1);
                let (sx, sy) = source_coords(
                    rotation,
                    orientation.is_mirrored(),
                    frame.width(),
                    frame.height(),
                    ox,
                    oy,
                );
                let (row, col) = (sy as usize, sx as usize);
                let value = luma(
                    pixels[[row, col, 0]],
                    pixels[[row, col, 1]],
                    pixels[[row, col, 2]],
                );
                if value >= self.threshold {
                    data.push(FOREGROUND);
                    any_foreground = true;
                } else {
                    data.push(BACKGROUND);
                }
            }
        }

        if !any_foreground {
            return Ok(None);
        }
        Ok(Some(Mask::new(data, mw, mh)))
    }
}

/// Maps a pixel position in the oriented image back to sensor coordinates.
///
/// `(w, h)` are the sensor dimensions; mirroring flips the oriented x axis
/// before the rotation is undone.
fn source_coords(rotation: Rotation, mirrored: bool, w: u32, h: u32, ox: u32, oy: u32) -> (u32, u32) {
    let ow = if rotation.swaps_axes() { h } else { w };
    let ox = if mirrored { ow - 1 - ox } else { ox };
    match rotation {
        Rotation::None => (ox, oy),
        Rotation::Quarter => (oy, h - 1 - ox),
        Rotation::Half => (w - 1 - ox, h - 1 - oy),
        Rotation::ThreeQuarter => (w - 1 - oy, ox),
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}
