use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use segmatte_core::compositing::infrastructure::cpu_compositor::CpuCompositor;
use segmatte_core::detection::domain::face_detector::FaceDetector;
use segmatte_core::detection::infrastructure::blob_detector::BrightBlobDetector;
use segmatte_core::persistence::infrastructure::background_saver::BackgroundImageSaver;
use segmatte_core::persistence::infrastructure::png_writer::PngImageWriter;
use segmatte_core::persistence::infrastructure::retention::RetentionPolicy;
use segmatte_core::pipeline::frame_pipeline::{FramePipeline, PipelineConfig};
use segmatte_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use segmatte_core::pipeline::pipeline_result::FrameRequest;
use segmatte_core::segmentation::domain::person_segmenter::SegmentationQuality;
use segmatte_core::segmentation::infrastructure::luma_segmenter::LumaSegmenter;
use segmatte_core::shared::frame::Frame;
use segmatte_core::shared::orientation::Orientation;

/// Person segmentation mattes from single frames.
#[derive(Parser)]
#[command(name = "segmatte")]
struct Cli {
    /// Input image files; each file's position is its frame index.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for composited frames (default: system temp dir).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Resize the square crop to a fixed size, e.g. 350x350 or 350.
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Also report a face count per frame.
    #[arg(long)]
    face_count: bool,

    /// Segmentation quality: fast, balanced, accurate.
    #[arg(long, default_value = "balanced")]
    quality: String,

    /// Luma threshold for the built-in segmenter (0-255).
    #[arg(long, default_value = "96")]
    threshold: u8,

    /// Keep only the newest N composited frames in the output directory.
    #[arg(long)]
    keep_last: Option<usize>,

    /// Remove composited frames older than this many seconds.
    #[arg(long)]
    max_age_secs: Option<u64>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let quality = parse_quality(&cli.quality)?;
    let out_dir = cli.out_dir.unwrap_or_else(std::env::temp_dir);

    let config = PipelineConfig {
        include_face_count: cli.face_count,
        ..Default::default()
    };
    let retention = RetentionPolicy {
        max_files: cli.keep_last,
        max_age: cli.max_age_secs.map(Duration::from_secs),
    };

    let detector: Option<Box<dyn FaceDetector>> = cli
        .face_count
        .then(|| Box::new(BrightBlobDetector::default()) as Box<dyn FaceDetector>);
    let mut pipeline = FramePipeline::new(
        Box::new(LumaSegmenter::new(cli.threshold, quality)),
        detector,
        // The compositor's rotation must match the segmentation orientation.
        Box::new(CpuCompositor::new(
            config.segmentation_orientation.rotation(),
            cli.resize,
        )),
        Box::new(BackgroundImageSaver::new(
            Box::new(PngImageWriter::new()),
            out_dir.clone(),
            retention,
        )),
        Box::new(StdoutPipelineLogger::new()),
        config,
    );

    log::info!("writing composited frames to {}", out_dir.display());
    for (index, input) in cli.inputs.iter().enumerate() {
        let frame = load_frame(input)?;
        let request = FrameRequest::new(&frame, index as u64);
        let result = pipeline.process(&request);
        println!("{}", serde_json::to_string(&result)?);
    }
    pipeline.finish();

    Ok(())
}

fn load_frame(path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height, 3, Orientation::Up))
}

fn parse_quality(value: &str) -> Result<SegmentationQuality, String> {
    match value {
        "fast" => Ok(SegmentationQuality::Fast),
        "balanced" => Ok(SegmentationQuality::Balanced),
        "accurate" => Ok(SegmentationQuality::Accurate),
        other => Err(format!(
            "unknown quality '{other}' (expected fast, balanced, or accurate)"
        )),
    }
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let parse = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| format!("invalid size component '{s}'"))
    };
    match value.split_once('x') {
        Some((w, h)) => Ok((parse(w)?, parse(h)?)),
        None => {
            let side = parse(value)?;
            Ok((side, side))
        }
    }
}
