use crate::detection::domain::face_detector::{Detection, DetectionCallback, FaceDetector};
use crate::shared::frame::Frame;
use crate::shared::orientation::Orientation;

/// Connected-component counter over bright pixels: a non-ML stand-in
/// collaborator for demos and tests.
///
/// Each request runs on its own worker thread and completes the callback
/// from there, so callers exercise the same cross-thread wait they would
/// against a real detection service. The reported count is
/// orientation-invariant; bounding boxes are in sensor coordinates.
pub struct BrightBlobDetector {
    threshold: u8,
    min_area: usize,
}

impl BrightBlobDetector {
    pub fn new(threshold: u8, min_area: usize) -> Self {
        Self {
            threshold,
            min_area,
        }
    }
}

impl Default for BrightBlobDetector {
    fn default() -> Self {
        Self::new(160, 4)
    }
}

impl FaceDetector for BrightBlobDetector {
    fn detect(&mut self, frame: &Frame, _orientation: Orientation, on_complete: DetectionCallback) {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let plane = luma_plane(frame);
        let threshold = self.threshold;
        let min_area = self.min_area;

        std::thread::spawn(move || {
            let detections = find_blobs(&plane, width, height, threshold, min_area);
            on_complete(Ok(detections));
        });
    }
}

fn luma_plane(frame: &Frame) -> Vec<u8> {
    let pixels = frame.as_ndarray();
    let mut plane = Vec::with_capacity((frame.width() * frame.height()) as usize);
    for row in 0..frame.height() as usize {
        for col in 0..frame.width() as usize {
            let r = pixels[[row, col, 0]] as u32;
            let g = pixels[[row, col, 1]] as u32;
            let b = pixels[[row, col, 2]] as u32;
            plane.push(((77 * r + 150 * g + 29 * b) >> 8) as u8);
        }
    }
    plane
}

/// 4-connected flood fill over the thresholded luma plane; components
/// smaller than `min_area` are discarded as noise.
fn find_blobs(
    plane: &[u8],
    width: usize,
    height: usize,
    threshold: u8,
    min_area: usize,
) -> Vec<Detection> {
    let mut visited = vec![false; plane.len()];
    let mut detections = Vec::new();
    let mut stack = Vec::new();

    for start in 0..plane.len() {
        if visited[start] || plane[start] < threshold {
            continue;
        }

        let (mut min_x, mut min_y) = (width, height);
        let (mut max_x, mut max_y) = (0usize, 0usize);
        let mut area = 0usize;

        visited[start] = true;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let x = idx % width;
            let y = idx / width;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            area += 1;

            let neighbors = [
                (x > 0).then(|| idx - 1),
                (x + 1 < width).then(|| idx + 1),
                (y > 0).then(|| idx - width),
                (y + 1 < height).then(|| idx + width),
            ];
            for neighbor in neighbors.into_iter().flatten() {
                if !visited[neighbor] && plane[neighbor] >= threshold {
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }

        if area >= min_area {
            detections.push(Detection {
                x: min_x as u32,
                y: min_y as u32,
                width: (max_x - min_x + 1) as u32,
                height: (max_y - min_y + 1) as u32,
                confidence: 1.0,
            });
        }
    }

    detections
}
