mod preview_window;

use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use clap::Parser;

use fare_validator_core::capture::domain::frame_source::FrameSource;
use fare_validator_core::capture::infrastructure::ffmpeg_frame_source::FfmpegFrameSource;
use fare_validator_core::classification::infrastructure::age_net_classifier::AgeNetClassifier;
use fare_validator_core::detection::infrastructure::ssd_face_localizer::SsdFaceLocalizer;
use fare_validator_core::inference::infrastructure::model_resolver::{self, ModelLocation};
use fare_validator_core::inference::infrastructure::onnx_model::OnnxModel;
use fare_validator_core::pipeline::annotate_frame_use_case::AnnotateFrameUseCase;
use fare_validator_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use fare_validator_core::pipeline::validate_stream_use_case::{StreamSummary, ValidateStreamUseCase};
use fare_validator_core::rendering::domain::annotation_renderer::AnnotationRenderer;
use fare_validator_core::rendering::domain::render_sink::RenderSink;
use fare_validator_core::rendering::domain::stop_signal::StopSignal;
use fare_validator_core::rendering::infrastructure::ffmpeg_video_sink::FfmpegVideoSink;
use fare_validator_core::rendering::infrastructure::image_snapshot_sink::ImageSnapshotSink;
use fare_validator_core::rendering::infrastructure::imageproc_renderer::ImageprocRenderer;
use fare_validator_core::rendering::infrastructure::preview_channel::preview_channel;
use fare_validator_core::rendering::infrastructure::stdin_stop_signal::StdinStopSignal;
use fare_validator_core::shared::constants::{
    AGE_MODEL_NAME, BUNDLED_MODEL_DIR, CONFIDENCE_THRESHOLD, DEFAULT_SOURCE, DETECTOR_MODEL_NAME,
    SNAPSHOT_EXTENSIONS,
};

const STOP_KEY: char = 'q';
const PROGRESS_EVERY_FRAMES: usize = 100;

/// Live transit fare validation: detects faces, estimates an age group
/// for each, and annotates the fare concession that applies.
#[derive(Parser)]
#[command(name = "fare-validator")]
struct Cli {
    /// Camera device or video file.
    #[arg(long, default_value = DEFAULT_SOURCE)]
    source: String,

    /// Face detection confidence threshold (0.0-1.0); faces must score above it.
    #[arg(long, default_value_t = CONFIDENCE_THRESHOLD)]
    confidence: f32,

    /// Face detector model file (skips the model search).
    #[arg(long)]
    detector_model: Option<PathBuf>,

    /// Age classifier model file (skips the model search).
    #[arg(long)]
    age_model: Option<PathBuf>,

    /// Directory searched for bundled models.
    #[arg(long, default_value = BUNDLED_MODEL_DIR)]
    models_dir: PathBuf,

    /// Download URL for the face detector if it is not found locally.
    #[arg(long)]
    detector_url: Option<String>,

    /// Download URL for the age classifier if it is not found locally.
    #[arg(long)]
    age_url: Option<String>,

    /// Record the annotated stream to this video file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Keep this image file updated with the latest annotated frame.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Show the live window even when recording (it is shown by default
    /// when neither --output nor --snapshot is given).
    #[arg(long)]
    window: bool,

    /// TrueType font for labels (defaults to a system font).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,
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
    validate(&cli)?;

    let pipeline = build_pipeline(&cli)?;

    let mut source: Box<dyn FrameSource> = Box::new(FfmpegFrameSource::new());
    let metadata = source.open(&cli.source)?;

    let mut sinks: Vec<Box<dyn RenderSink>> = Vec::new();
    if let Some(output) = &cli.output {
        sinks.push(Box::new(FfmpegVideoSink::new(output, metadata.fps)));
    }
    if let Some(snapshot) = &cli.snapshot {
        sinks.push(Box::new(ImageSnapshotSink::new(snapshot)));
    }
    let logger = Box::new(StdoutPipelineLogger::new(PROGRESS_EVERY_FRAMES));

    let summary = if shows_window(&cli) {
        let (preview, feed) = preview_channel();
        sinks.push(Box::new(preview));
        let stop: Box<dyn StopSignal> = Box::new(feed.stop_signal());
        let mut use_case =
            ValidateStreamUseCase::new(source, pipeline, sinks, stop, logger, cli.max_frames);

        eprintln!(
            "Validating fares from {}. Press '{STOP_KEY}' in the window or close it to stop.",
            cli.source
        );

        // The window owns the main thread; the loop runs beside it.
        let (done_tx, done) = crossbeam_channel::bounded::<()>(1);
        let size = (metadata.width, metadata.height);
        let worker = thread::spawn(move || {
            let result = use_case.execute(&metadata).map_err(|e| e.to_string());
            drop(done_tx);
            result
        });

        let window_result = preview_window::run(feed.clone(), done, size);
        feed.request_stop();
        let summary = worker
            .join()
            .map_err(|_| "validation worker panicked")??;
        window_result?;
        summary
    } else {
        eprintln!("Validating fares from {}. Press '{STOP_KEY}' then Enter to stop.", cli.source);
        let mut use_case = ValidateStreamUseCase::new(
            source,
            pipeline,
            sinks,
            Box::new(StdinStopSignal::spawn(STOP_KEY)),
            logger,
            cli.max_frames,
        );
        use_case.execute(&metadata)?
    };

    report(&cli, &summary);
    Ok(())
}

fn report(cli: &Cli, summary: &StreamSummary) {
    if let Some(output) = &cli.output {
        log::info!("Annotated video written to {}", output.display());
    }
    log::info!(
        "Processed {} frames, annotated {} faces",
        summary.frames,
        summary.annotated_faces
    );
}

/// The live window is the default display; recording sinks replace it
/// unless it is asked for explicitly.
fn shows_window(cli: &Cli) -> bool {
    cli.window || (cli.output.is_none() && cli.snapshot.is_none())
}

fn build_pipeline(cli: &Cli) -> Result<AnnotateFrameUseCase, Box<dyn std::error::Error>> {
    let detector_path = resolve_model(
        DETECTOR_MODEL_NAME,
        cli.detector_model.as_deref(),
        &cli.models_dir,
        cli.detector_url.as_deref(),
    )?;
    let age_path = resolve_model(
        AGE_MODEL_NAME,
        cli.age_model.as_deref(),
        &cli.models_dir,
        cli.age_url.as_deref(),
    )?;

    let localizer = SsdFaceLocalizer::new(Box::new(OnnxModel::load(&detector_path)?));
    let classifier = AgeNetClassifier::new(Box::new(OnnxModel::load(&age_path)?));
    let renderer: Box<dyn AnnotationRenderer> = match &cli.font {
        Some(font) => Box::new(ImageprocRenderer::with_font_file(font)?),
        None => Box::new(ImageprocRenderer::with_system_font()),
    };

    Ok(AnnotateFrameUseCase::new(
        Box::new(localizer),
        Box::new(classifier),
        renderer,
        Some(cli.confidence),
    ))
}

fn resolve_model(
    name: &str,
    explicit: Option<&Path>,
    models_dir: &Path,
    url: Option<&str>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let location = ModelLocation {
        name,
        explicit,
        bundled_dir: Some(models_dir),
        url,
    };
    let path = model_resolver::resolve(&location, Some(Box::new(download_progress)))?;
    log::debug!("Using {name} at {}", path.display());
    Ok(path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(snapshot) = &cli.snapshot {
        if !is_snapshot_image(snapshot) {
            return Err(format!(
                "Snapshot must be one of: {}, got {}",
                SNAPSHOT_EXTENSIONS.join(", "),
                snapshot.display()
            )
            .into());
        }
    }
    if cli.max_frames == Some(0) {
        return Err("--max-frames must be at least 1".into());
    }
    Ok(())
}

fn is_snapshot_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SNAPSHOT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fare-validator").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.source, DEFAULT_SOURCE);
        assert_eq!(cli.confidence, CONFIDENCE_THRESHOLD);
        assert_eq!(cli.models_dir, PathBuf::from(BUNDLED_MODEL_DIR));
        assert!(!cli.window);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_window_is_default_display() {
        assert!(shows_window(&parse(&[])));
        assert!(!shows_window(&parse(&["--output", "out.mp4"])));
        assert!(!shows_window(&parse(&["--snapshot", "live.png"])));
        assert!(shows_window(&parse(&["--output", "out.mp4", "--window"])));
    }

    #[test]
    fn test_rejects_confidence_out_of_range() {
        assert!(validate(&parse(&["--output", "out.mp4", "--confidence", "1.5"])).is_err());
    }

    #[test]
    fn test_rejects_unknown_snapshot_format() {
        assert!(validate(&parse(&["--snapshot", "live.gif"])).is_err());
        assert!(validate(&parse(&["--snapshot", "live.JPG"])).is_ok());
    }

    #[test]
    fn test_rejects_zero_max_frames() {
        assert!(validate(&parse(&["--output", "out.mp4", "--max-frames", "0"])).is_err());
    }
}
