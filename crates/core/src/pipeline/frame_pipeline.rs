use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::detection::domain::face_detector::FaceDetector;
use crate::persistence::domain::image_saver::ImageSaver;
use crate::pipeline::error::PipelineError;
use crate::pipeline::face_count;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::pipeline_result::{FrameRequest, PipelineResult};
use crate::segmentation::domain::person_segmenter::PersonSegmenter;
use crate::shared::orientation::Orientation;

/// Per-pipeline configuration.
///
/// The two collaborator orientations are independent: the segmenter sees
/// the frame one quarter-turn from sensor orientation, the detector sees it
/// mirrored. The compositor's rotation must agree with
/// `segmentation_orientation` for masks to line up.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    pub include_face_count: bool,
    pub segmentation_orientation: Orientation,
    pub detection_orientation: Orientation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            include_face_count: false,
            segmentation_orientation: Orientation::Right,
            detection_orientation: Orientation::LeftMirrored,
        }
    }
}

/// Per-frame orchestration: segment → composite → (count faces) → persist.
///
/// One `process` call per delivered frame, on the host's media thread; no
/// state is carried across invocations. Detection is submitted before
/// segmentation starts and awaited after compositing, so the two
/// collaborators overlap. Every failure, including a collaborator panic,
/// comes back as an error envelope; nothing unwinds into the host.
pub struct FramePipeline {
    segmenter: Box<dyn PersonSegmenter>,
    detector: Option<Box<dyn FaceDetector>>,
    compositor: Box<dyn FrameCompositor>,
    saver: Box<dyn ImageSaver>,
    logger: Box<dyn PipelineLogger>,
    config: PipelineConfig,
}

impl FramePipeline {
    pub fn new(
        segmenter: Box<dyn PersonSegmenter>,
        detector: Option<Box<dyn FaceDetector>>,
        compositor: Box<dyn FrameCompositor>,
        saver: Box<dyn ImageSaver>,
        logger: Box<dyn PipelineLogger>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            segmenter,
            detector,
            compositor,
            saver,
            logger,
            config,
        }
    }

    /// Processes one frame and returns the result envelope.
    pub fn process(&mut self, request: &FrameRequest<'_>) -> PipelineResult {
        match panic::catch_unwind(AssertUnwindSafe(|| self.process_inner(request))) {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => PipelineResult::from(&e),
            Err(payload) => {
                let details = describe_panic(payload);
                log::error!("pipeline fault: {details}");
                PipelineResult::from(&PipelineError::Unexpected(details))
            }
        }
    }

    /// Reports the end-of-run summary through the logger.
    pub fn finish(&self) {
        self.logger.summary();
    }

    fn process_inner(&mut self, request: &FrameRequest<'_>) -> Result<PipelineResult, PipelineError> {
        let frame = request.frame;
        if frame.data().is_empty() {
            return Err(PipelineError::NoImageBuffer);
        }
        let frame_index = request.frame_index.ok_or(PipelineError::MissingFrameIndex)?;

        // Submit detection first; it runs while we segment and composite.
        let pending_count = match &mut self.detector {
            Some(detector) if self.config.include_face_count => Some(face_count::submit(
                detector.as_mut(),
                frame,
                self.config.detection_orientation,
            )),
            _ => None,
        };

        let started = Instant::now();
        let mask = match self
            .segmenter
            .segment(frame, self.config.segmentation_orientation)
        {
            Ok(Some(mask)) => mask,
            Ok(None) => return Err(PipelineError::SegmentationUnavailable),
            Err(e) => {
                log::warn!("segmentation failed: {e}");
                return Err(PipelineError::SegmentationUnavailable);
            }
        };
        self.logger.timing("segment", elapsed_ms(started));

        let started = Instant::now();
        let image = match self.compositor.composite(frame, &mask) {
            Ok(Some(image)) => image,
            Ok(None) => return Err(PipelineError::Compositing),
            Err(e) => {
                log::warn!("compositing failed: {e}");
                return Err(PipelineError::Compositing);
            }
        };
        self.logger.timing("composite", elapsed_ms(started));

        let path = self.saver.save_async(image, frame_index);

        let num_faces = pending_count.map(|rx| {
            let started = Instant::now();
            let count = face_count::wait(rx);
            self.logger.timing("detect", elapsed_ms(started));
            self.logger.metric("faces", count as f64);
            count
        });

        self.logger.frame(frame_index);
        Ok(PipelineResult::Success {
            uri: path.to_string_lossy().into_owned(),
            num_faces,
        })
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn describe_panic(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::{Detection, DetectionCallback};
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::composite_image::CompositeImage;
    use crate::shared::frame::Frame;
    use crate::shared::mask::Mask;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    type EventLog = Arc<Mutex<Vec<&'static str>>>;

    // --- Stubs ---

    enum SegmenterBehavior {
        Mask,
        NoMask,
        Fail,
        Panic,
    }

    struct StubSegmenter {
        behavior: SegmenterBehavior,
        events: Option<EventLog>,
    }

    impl PersonSegmenter for StubSegmenter {
        fn segment(
            &mut self,
            frame: &Frame,
            _orientation: Orientation,
        ) -> Result<Option<Mask>, Box<dyn std::error::Error>> {
            if let Some(events) = &self.events {
                events.lock().unwrap().push("segment");
            }
            match self.behavior {
                SegmenterBehavior::Mask => Ok(Some(Mask::new(
                    vec![255; (frame.width() * frame.height()) as usize],
                    frame.width(),
                    frame.height(),
                ))),
                SegmenterBehavior::NoMask => Ok(None),
                SegmenterBehavior::Fail => Err("segmenter offline".into()),
                SegmenterBehavior::Panic => panic!("mask buffer poisoned"),
            }
        }
    }

    struct StubCompositor {
        produce: bool,
        fail: bool,
    }

    impl FrameCompositor for StubCompositor {
        fn composite(
            &self,
            _frame: &Frame,
            _mask: &Mask,
        ) -> Result<Option<CompositeImage>, Box<dyn std::error::Error>> {
            if self.fail {
                return Err("no renderable output".into());
            }
            if !self.produce {
                return Ok(None);
            }
            Ok(Some(CompositeImage::new(vec![0u8; 2 * 2 * 4], 2, 2)))
        }
    }

    struct StubDetector {
        count: usize,
        events: Option<EventLog>,
    }

    impl FaceDetector for StubDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
            _orientation: Orientation,
            on_complete: DetectionCallback,
        ) {
            if let Some(events) = &self.events {
                events.lock().unwrap().push("detect");
            }
            let detections = vec![
                Detection {
                    x: 0,
                    y: 0,
                    width: 1,
                    height: 1,
                    confidence: 1.0,
                };
                self.count
            ];
            on_complete(Ok(detections));
        }
    }

    struct RecordingSaver {
        saved: Arc<Mutex<Vec<u64>>>,
    }

    impl ImageSaver for RecordingSaver {
        fn save_async(&self, _image: CompositeImage, frame_index: u64) -> PathBuf {
            self.saved.lock().unwrap().push(frame_index);
            PathBuf::from(format!("/captures/image-{frame_index}.png"))
        }
    }

    // --- Helpers ---

    fn make_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![128; (w * h * 3) as usize], w, h, 3, Orientation::Up)
    }

    fn pipeline(
        segmenter: StubSegmenter,
        detector: Option<StubDetector>,
        compositor: StubCompositor,
        include_face_count: bool,
    ) -> (FramePipeline, Arc<Mutex<Vec<u64>>>) {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let pipeline = FramePipeline::new(
            Box::new(segmenter),
            detector.map(|d| Box::new(d) as Box<dyn FaceDetector>),
            Box::new(compositor),
            Box::new(RecordingSaver {
                saved: saved.clone(),
            }),
            Box::new(NullPipelineLogger),
            PipelineConfig {
                include_face_count,
                ..Default::default()
            },
        );
        (pipeline, saved)
    }

    fn working_segmenter() -> StubSegmenter {
        StubSegmenter {
            behavior: SegmenterBehavior::Mask,
            events: None,
        }
    }

    fn working_compositor() -> StubCompositor {
        StubCompositor {
            produce: true,
            fail: false,
        }
    }

    // --- Tests ---

    #[test]
    fn test_success_with_face_count() {
        let (mut pipeline, saved) = pipeline(
            working_segmenter(),
            Some(StubDetector {
                count: 3,
                events: None,
            }),
            working_compositor(),
            true,
        );

        let frame = make_frame(4, 4);
        let result = pipeline.process(&FrameRequest::new(&frame, 7));

        assert_eq!(
            result,
            PipelineResult::Success {
                uri: "/captures/image-7.png".into(),
                num_faces: Some(3),
            }
        );
        assert_eq!(*saved.lock().unwrap(), vec![7]);
    }

    #[test]
    fn test_face_count_disabled_skips_detector() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (mut pipeline, _) = pipeline(
            working_segmenter(),
            Some(StubDetector {
                count: 3,
                events: Some(events.clone()),
            }),
            working_compositor(),
            false,
        );

        let frame = make_frame(4, 4);
        let result = pipeline.process(&FrameRequest::new(&frame, 0));

        assert_eq!(
            result,
            PipelineResult::Success {
                uri: "/captures/image-0.png".into(),
                num_faces: None,
            }
        );
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detection_submitted_before_segmentation() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (mut pipeline, _) = pipeline(
            StubSegmenter {
                behavior: SegmenterBehavior::Mask,
                events: Some(events.clone()),
            },
            Some(StubDetector {
                count: 0,
                events: Some(events.clone()),
            }),
            working_compositor(),
            true,
        );

        let frame = make_frame(4, 4);
        pipeline.process(&FrameRequest::new(&frame, 0));

        assert_eq!(*events.lock().unwrap(), vec!["detect", "segment"]);
    }

    #[test]
    fn test_no_mask_yields_failed_to_process() {
        let (mut pipeline, saved) = pipeline(
            StubSegmenter {
                behavior: SegmenterBehavior::NoMask,
                events: None,
            },
            None,
            working_compositor(),
            false,
        );

        let frame = make_frame(4, 4);
        let result = pipeline.process(&FrameRequest::new(&frame, 0));

        assert_eq!(
            result,
            PipelineResult::Error {
                error: "Failed to process image".into()
            }
        );
        assert!(saved.lock().unwrap().is_empty());
    }

    #[test]
    fn test_segmenter_error_yields_failed_to_process() {
        let (mut pipeline, _) = pipeline(
            StubSegmenter {
                behavior: SegmenterBehavior::Fail,
                events: None,
            },
            None,
            working_compositor(),
            false,
        );

        let frame = make_frame(4, 4);
        let result = pipeline.process(&FrameRequest::new(&frame, 0));
        assert_eq!(
            result,
            PipelineResult::Error {
                error: "Failed to process image".into()
            }
        );
    }

    #[test]
    fn test_compositor_none_and_error_yield_failed_to_process() {
        for compositor in [
            StubCompositor {
                produce: false,
                fail: false,
            },
            StubCompositor {
                produce: false,
                fail: true,
            },
        ] {
            let (mut p, _) = pipeline(working_segmenter(), None, compositor, false);
            let frame = make_frame(4, 4);
            assert_eq!(
                p.process(&FrameRequest::new(&frame, 0)),
                PipelineResult::Error {
                    error: "Failed to process image".into()
                }
            );
        }
    }

    #[test]
    fn test_missing_frame_index_fails_fast() {
        let (mut pipeline, saved) =
            pipeline(working_segmenter(), None, working_compositor(), false);

        let frame = make_frame(4, 4);
        let result = pipeline.process(&FrameRequest::without_index(&frame));

        assert_eq!(
            result,
            PipelineResult::Error {
                error: "missing frame index".into()
            }
        );
        assert!(saved.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_frame_reports_no_image_buffer() {
        let (mut pipeline, _) = pipeline(working_segmenter(), None, working_compositor(), false);

        let frame = Frame::new(Vec::new(), 0, 0, 3, Orientation::Up);
        let result = pipeline.process(&FrameRequest::new(&frame, 0));

        assert_eq!(
            result,
            PipelineResult::Error {
                error: "no image buffer".into()
            }
        );
    }

    #[test]
    fn test_end_to_end_with_builtin_collaborators() {
        use crate::compositing::infrastructure::cpu_compositor::CpuCompositor;
        use crate::detection::infrastructure::blob_detector::BrightBlobDetector;
        use crate::persistence::infrastructure::background_saver::BackgroundImageSaver;
        use crate::persistence::infrastructure::png_writer::PngImageWriter;
        use crate::persistence::infrastructure::retention::RetentionPolicy;
        use crate::segmentation::domain::person_segmenter::SegmentationQuality;
        use crate::segmentation::infrastructure::luma_segmenter::LumaSegmenter;

        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            include_face_count: true,
            ..Default::default()
        };
        let mut pipeline = FramePipeline::new(
            Box::new(LumaSegmenter::new(96, SegmentationQuality::Balanced)),
            Some(Box::new(BrightBlobDetector::new(160, 4))),
            Box::new(CpuCompositor::new(
                config.segmentation_orientation.rotation(),
                None,
            )),
            Box::new(BackgroundImageSaver::new(
                Box::new(PngImageWriter::new()),
                dir.path().to_path_buf(),
                RetentionPolicy::default(),
            )),
            Box::new(NullPipelineLogger),
            config,
        );

        // One bright 6x6 square on a dark 16x12 frame: one subject, one blob.
        let mut data = vec![0u8; 16 * 12 * 3];
        for y in 2..8u32 {
            for x in 2..8u32 {
                let offset = ((y * 16 + x) * 3) as usize;
                data[offset..offset + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        let frame = Frame::new(data, 16, 12, 3, Orientation::Up);

        let result = pipeline.process(&FrameRequest::new(&frame, 42));
        let (uri, num_faces) = match result {
            PipelineResult::Success { uri, num_faces } => (uri, num_faces),
            other => panic!("expected success, got {other:?}"),
        };
        assert!(uri.ends_with("image-42.png"));
        assert_eq!(num_faces, Some(1));

        drop(pipeline); // joins the background writer
        let img = image::open(&uri).unwrap().to_rgba8();
        assert_eq!(img.width(), img.height());
        assert_eq!(img.width(), 12); // min(16, 12)
    }

    #[test]
    fn test_collaborator_panic_becomes_error_envelope() {
        let (mut pipeline, _) = pipeline(
            StubSegmenter {
                behavior: SegmenterBehavior::Panic,
                events: None,
            },
            None,
            working_compositor(),
            false,
        );

        let frame = make_frame(4, 4);
        let result = pipeline.process(&FrameRequest::new(&frame, 0));

        match result {
            PipelineResult::Error { error } => {
                assert_eq!(error, "Error processing image: mask buffer poisoned");
            }
            other => panic!("expected error envelope, got {other:?}"),
        }
    }
}
