use crossbeam_channel::{bounded, Receiver};

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::orientation::Orientation;

/// Synchronous face counting over the asynchronous detection collaborator.
///
/// The detector's completion callback is wired to a one-shot channel;
/// `wait` blocks the calling thread until the collaborator signals. Frame
/// processing runs on a dedicated media thread, never the UI thread, which
/// is what makes the blocking wait acceptable. No timeout is applied: a
/// collaborator that never completes stalls that frame's call indefinitely.
///
/// A collaborator error, an empty result, or a dropped callback all count
/// as zero faces; nothing here ever fails.
pub fn submit(
    detector: &mut dyn FaceDetector,
    frame: &Frame,
    orientation: Orientation,
) -> Receiver<usize> {
    let (tx, rx) = bounded::<usize>(1);
    detector.detect(
        frame,
        orientation,
        Box::new(move |result| {
            let count = match result {
                Ok(detections) => detections.len(),
                Err(e) => {
                    log::warn!("face detection failed: {e}");
                    0
                }
            };
            let _ = tx.send(count);
        }),
    );
    rx
}

/// Blocks until the detection submitted on `rx` completes.
pub fn wait(rx: Receiver<usize>) -> usize {
    rx.recv().unwrap_or(0)
}

/// Submit-and-wait in one step, for callers with nothing to overlap.
pub fn blocking_face_count(
    detector: &mut dyn FaceDetector,
    frame: &Frame,
    orientation: Orientation,
) -> usize {
    wait(submit(detector, frame, orientation))
}
