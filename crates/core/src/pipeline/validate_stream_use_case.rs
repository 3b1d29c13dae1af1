use crate::capture::domain::frame_source::{Capture, FrameSource};
use crate::rendering::domain::render_sink::RenderSink;
use crate::rendering::domain::stop_signal::StopSignal;
use crate::shared::video_metadata::VideoMetadata;

use super::annotate_frame_use_case::AnnotateFrameUseCase;
use super::pipeline_logger::PipelineLogger;

/// Why the validation loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopCause {
    StopRequested,
    EndOfStream,
    FrameLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSummary {
    pub frames: usize,
    pub annotated_faces: usize,
    pub cause: StopCause,
}

/// Drives the per-frame loop: acquire, annotate, show, poll for stop.
///
/// The source must already be open; `metadata` is what `open` returned.
/// On exit the source and every sink are closed, even when a sink fails.
pub struct ValidateStreamUseCase {
    source: Box<dyn FrameSource>,
    pipeline: AnnotateFrameUseCase,
    sinks: Vec<Box<dyn RenderSink>>,
    stop: Box<dyn StopSignal>,
    logger: Box<dyn PipelineLogger>,
    max_frames: Option<usize>,
}

impl ValidateStreamUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        pipeline: AnnotateFrameUseCase,
        sinks: Vec<Box<dyn RenderSink>>,
        stop: Box<dyn StopSignal>,
        logger: Box<dyn PipelineLogger>,
        max_frames: Option<usize>,
    ) -> Self {
        Self {
            source,
            pipeline,
            sinks,
            stop,
            logger,
            max_frames,
        }
    }

    pub fn execute(
        &mut self,
        metadata: &VideoMetadata,
    ) -> Result<StreamSummary, Box<dyn std::error::Error>> {
        let result = self.run_loop(metadata);

        self.source.close();
        let mut close_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.close() {
                log::error!("Failed to close output: {e}");
                close_error.get_or_insert(e);
            }
        }

        let summary = result?;
        if let Some(e) = close_error {
            return Err(e);
        }

        self.logger.info(&format!(
            "Stopped ({:?}) after {} frames, {} faces annotated",
            summary.cause, summary.frames, summary.annotated_faces
        ));
        self.logger.summary();
        Ok(summary)
    }

    fn run_loop(
        &mut self,
        metadata: &VideoMetadata,
    ) -> Result<StreamSummary, Box<dyn std::error::Error>> {
        let mut frames = 0;
        let mut annotated_faces = 0;

        let cause = loop {
            if self.max_frames.is_some_and(|max| frames >= max) {
                break StopCause::FrameLimit;
            }

            let mut frame = match self.source.next_frame() {
                Capture::Frame(frame) => frame,
                Capture::EndOfStream => break StopCause::EndOfStream,
            };

            match self.pipeline.annotate_logged(&mut frame, self.logger.as_mut()) {
                Ok(report) => annotated_faces += report.annotations().len(),
                Err(e) => log::warn!("Frame {}: {e}; showing it unannotated", frame.index()),
            }

            for sink in &mut self.sinks {
                sink.show(&frame)?;
            }

            frames += 1;
            self.logger.progress(frames, metadata.total_frames);

            if self.stop.stop_requested() {
                break StopCause::StopRequested;
            }
        };

        Ok(StreamSummary {
            frames,
            annotated_faces,
            cause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::age_classifier::AgeClassifier;
    use crate::detection::domain::detection::Detection;
    use crate::detection::domain::face_localizer::FaceLocalizer;
    use crate::fare::domain::age_bucket::AgeBucket;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::rendering::domain::annotation_renderer::AnnotationRenderer;
    use crate::rendering::domain::stop_signal::NeverStop;
    use crate::shared::annotation::Annotation;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::frame::Frame;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubSource {
        frames: VecDeque<Frame>,
        closed: Arc<Mutex<bool>>,
    }

    impl FrameSource for StubSource {
        fn open(&mut self, source: &str) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            Ok(metadata(source, self.frames.len()))
        }

        fn next_frame(&mut self) -> Capture {
            match self.frames.pop_front() {
                Some(frame) => Capture::Frame(frame),
                None => Capture::EndOfStream,
            }
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct StubSink {
        shown: Arc<Mutex<Vec<usize>>>,
        closed: Arc<Mutex<bool>>,
        fail_on: Option<usize>,
    }

    impl RenderSink for StubSink {
        fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_on == Some(frame.index()) {
                return Err("display lost".into());
            }
            self.shown.lock().unwrap().push(frame.index());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    /// Requests a stop on the `after`-th poll.
    struct StopAfter {
        after: usize,
        polls: AtomicUsize,
    }

    impl StopSignal for StopAfter {
        fn stop_requested(&self) -> bool {
            self.polls.fetch_add(1, Ordering::SeqCst) + 1 >= self.after
        }
    }

    /// One face per frame; fails on the listed frame indices.
    struct StubLocalizer {
        fail_on: Vec<usize>,
    }

    impl FaceLocalizer for StubLocalizer {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            if self.fail_on.contains(&frame.index()) {
                return Err("localizer failed".into());
            }
            Ok(vec![Detection {
                bbox: BoundingBox::new(1, 1, 8, 8),
                confidence: 0.95,
            }])
        }
    }

    struct FixedClassifier;

    impl AgeClassifier for FixedClassifier {
        fn classify(&mut self, _: &Frame) -> Result<AgeBucket, Box<dyn std::error::Error>> {
            Ok(AgeBucket::Age8To12)
        }
    }

    struct MarkingRenderer;

    impl AnnotationRenderer for MarkingRenderer {
        fn render(
            &self,
            frame: &mut Frame,
            annotations: &[Annotation],
        ) -> Result<(), Box<dyn std::error::Error>> {
            if !annotations.is_empty() {
                frame.data_mut()[0] = 255;
            }
            Ok(())
        }
    }

    struct FailingRenderer;

    impl AnnotationRenderer for FailingRenderer {
        fn render(&self, _: &mut Frame, _: &[Annotation]) -> Result<(), Box<dyn std::error::Error>> {
            Err("renderer failed".into())
        }
    }

    // --- Helpers ---

    fn metadata(source: &str, total_frames: usize) -> VideoMetadata {
        VideoMetadata {
            width: 10,
            height: 10,
            fps: 30.0,
            total_frames,
            source: source.to_string(),
        }
    }

    fn frames(n: usize) -> VecDeque<Frame> {
        (0..n).map(|i| Frame::new(vec![0; 300], 10, 10, i)).collect()
    }

    fn pipeline(fail_on: Vec<usize>) -> AnnotateFrameUseCase {
        AnnotateFrameUseCase::new(
            Box::new(StubLocalizer { fail_on }),
            Box::new(FixedClassifier),
            Box::new(MarkingRenderer),
            None,
        )
    }

    struct Observed {
        shown: Arc<Mutex<Vec<usize>>>,
        sink_closed: Arc<Mutex<bool>>,
        source_closed: Arc<Mutex<bool>>,
    }

    fn build(
        n: usize,
        stop: Box<dyn StopSignal>,
        max_frames: Option<usize>,
        localizer_fail_on: Vec<usize>,
        sink_fail_on: Option<usize>,
    ) -> (ValidateStreamUseCase, Observed) {
        let observed = Observed {
            shown: Arc::new(Mutex::new(Vec::new())),
            sink_closed: Arc::new(Mutex::new(false)),
            source_closed: Arc::new(Mutex::new(false)),
        };
        let source = StubSource {
            frames: frames(n),
            closed: observed.source_closed.clone(),
        };
        let sink = StubSink {
            shown: observed.shown.clone(),
            closed: observed.sink_closed.clone(),
            fail_on: sink_fail_on,
        };
        let use_case = ValidateStreamUseCase::new(
            Box::new(source),
            pipeline(localizer_fail_on),
            vec![Box::new(sink)],
            stop,
            Box::new(NullPipelineLogger),
            max_frames,
        );
        (use_case, observed)
    }

    // --- Tests ---

    #[test]
    fn test_runs_until_end_of_stream() {
        let (mut use_case, observed) = build(4, Box::new(NeverStop), None, vec![], None);

        let summary = use_case.execute(&metadata("clip.mp4", 4)).unwrap();

        assert_eq!(summary.cause, StopCause::EndOfStream);
        assert_eq!(summary.frames, 4);
        assert_eq!(summary.annotated_faces, 4);
        assert_eq!(*observed.shown.lock().unwrap(), vec![0, 1, 2, 3]);
        assert!(*observed.sink_closed.lock().unwrap());
        assert!(*observed.source_closed.lock().unwrap());
    }

    #[test]
    fn test_stop_signal_ends_after_current_frame() {
        let stop = StopAfter {
            after: 2,
            polls: AtomicUsize::new(0),
        };
        let (mut use_case, observed) = build(10, Box::new(stop), None, vec![], None);

        let summary = use_case.execute(&metadata("/dev/video0", 0)).unwrap();

        assert_eq!(summary.cause, StopCause::StopRequested);
        assert_eq!(summary.frames, 2);
        assert_eq!(*observed.shown.lock().unwrap(), vec![0, 1]);
        assert!(*observed.source_closed.lock().unwrap());
    }

    #[test]
    fn test_frame_limit() {
        let (mut use_case, observed) = build(10, Box::new(NeverStop), Some(3), vec![], None);

        let summary = use_case.execute(&metadata("clip.mp4", 10)).unwrap();

        assert_eq!(summary.cause, StopCause::FrameLimit);
        assert_eq!(summary.frames, 3);
        assert_eq!(observed.shown.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_stream() {
        let (mut use_case, observed) = build(0, Box::new(NeverStop), None, vec![], None);

        let summary = use_case.execute(&metadata("clip.mp4", 0)).unwrap();

        assert_eq!(summary.frames, 0);
        assert_eq!(summary.cause, StopCause::EndOfStream);
        assert!(observed.shown.lock().unwrap().is_empty());
        assert!(*observed.sink_closed.lock().unwrap());
    }

    #[test]
    fn test_localizer_failure_shows_frame_unannotated() {
        let (mut use_case, observed) = build(3, Box::new(NeverStop), None, vec![1], None);

        let summary = use_case.execute(&metadata("clip.mp4", 3)).unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.annotated_faces, 2);
        assert_eq!(*observed.shown.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_sink_failure_is_fatal_but_closes_everything() {
        let (mut use_case, observed) = build(5, Box::new(NeverStop), None, vec![], Some(2));

        assert!(use_case.execute(&metadata("clip.mp4", 5)).is_err());

        assert_eq!(*observed.shown.lock().unwrap(), vec![0, 1]);
        assert!(*observed.sink_closed.lock().unwrap());
        assert!(*observed.source_closed.lock().unwrap());
    }

    #[test]
    fn test_every_sink_receives_annotated_frames() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let sinks: Vec<Box<dyn RenderSink>> = vec![
            Box::new(StubSink {
                shown: first.clone(),
                closed: Arc::new(Mutex::new(false)),
                fail_on: None,
            }),
            Box::new(StubSink {
                shown: second.clone(),
                closed: Arc::new(Mutex::new(false)),
                fail_on: None,
            }),
        ];
        let source = StubSource {
            frames: frames(2),
            closed: Arc::new(Mutex::new(false)),
        };
        let mut use_case = ValidateStreamUseCase::new(
            Box::new(source),
            pipeline(vec![]),
            sinks,
            Box::new(NeverStop),
            Box::new(NullPipelineLogger),
            None,
        );

        use_case.execute(&metadata("clip.mp4", 2)).unwrap();

        assert_eq!(*first.lock().unwrap(), vec![0, 1]);
        assert_eq!(*second.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_renderer_failure_shows_frames_and_keeps_running() {
        let shown = Arc::new(Mutex::new(Vec::new()));
        let source = StubSource {
            frames: frames(3),
            closed: Arc::new(Mutex::new(false)),
        };
        let sink = StubSink {
            shown: shown.clone(),
            closed: Arc::new(Mutex::new(false)),
            fail_on: None,
        };
        let pipeline = AnnotateFrameUseCase::new(
            Box::new(StubLocalizer { fail_on: vec![] }),
            Box::new(FixedClassifier),
            Box::new(FailingRenderer),
            None,
        );
        let mut use_case = ValidateStreamUseCase::new(
            Box::new(source),
            pipeline,
            vec![Box::new(sink)],
            Box::new(NeverStop),
            Box::new(NullPipelineLogger),
            None,
        );

        let summary = use_case.execute(&metadata("clip.mp4", 3)).unwrap();

        assert_eq!(summary.cause, StopCause::EndOfStream);
        assert_eq!(summary.annotated_faces, 0);
        assert_eq!(*shown.lock().unwrap(), vec![0, 1, 2]);
    }
}
