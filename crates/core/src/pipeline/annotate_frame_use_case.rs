use std::time::Instant;

use crate::classification::domain::age_classifier::AgeClassifier;
use crate::detection::domain::face_localizer::FaceLocalizer;
use crate::fare::domain::fare_policy;
use crate::rendering::domain::annotation_renderer::AnnotationRenderer;
use crate::shared::annotation::Annotation;
use crate::shared::constants::CONFIDENCE_THRESHOLD;
use crate::shared::frame::Frame;

use super::frame_report::{FaceOutcome, FrameReport, SkipReason};
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Runs one frame through localize → filter → crop → classify → fare
/// decision, and optionally draws the result.
///
/// Every detection ends up in the report, either annotated or with the
/// reason it was skipped. A classification failure only skips that face.
pub struct AnnotateFrameUseCase {
    localizer: Box<dyn FaceLocalizer>,
    classifier: Box<dyn AgeClassifier>,
    renderer: Box<dyn AnnotationRenderer>,
    threshold: f32,
}

impl AnnotateFrameUseCase {
    pub fn new(
        localizer: Box<dyn FaceLocalizer>,
        classifier: Box<dyn AgeClassifier>,
        renderer: Box<dyn AnnotationRenderer>,
        threshold: Option<f32>,
    ) -> Self {
        Self {
            localizer,
            classifier,
            renderer,
            threshold: threshold.unwrap_or(CONFIDENCE_THRESHOLD),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn process(&mut self, frame: &Frame) -> Result<FrameReport, Box<dyn std::error::Error>> {
        self.process_logged(frame, &mut NullPipelineLogger)
    }

    /// Processes the frame and draws every annotation onto it.
    pub fn annotate(&mut self, frame: &mut Frame) -> Result<FrameReport, Box<dyn std::error::Error>> {
        self.annotate_logged(frame, &mut NullPipelineLogger)
    }

    pub fn process_logged(
        &mut self,
        frame: &Frame,
        logger: &mut dyn PipelineLogger,
    ) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let detections = self.localizer.detect(frame)?;
        logger.timing("detect", t0.elapsed().as_secs_f64() * 1000.0);

        let t0 = Instant::now();
        let mut outcomes = Vec::with_capacity(detections.len());
        for detection in detections {
            if !detection.passes(self.threshold) {
                outcomes.push(FaceOutcome::Skipped {
                    detection,
                    reason: SkipReason::BelowThreshold,
                });
                continue;
            }

            let Some(face) = frame.crop(&detection.bbox) else {
                outcomes.push(FaceOutcome::Skipped {
                    detection,
                    reason: SkipReason::DegenerateBox,
                });
                continue;
            };

            match self.classifier.classify(&face) {
                Ok(bucket) => outcomes.push(FaceOutcome::Annotated(Annotation {
                    bbox: detection.bbox,
                    bucket,
                    decision: fare_policy::classify(bucket),
                })),
                Err(e) => {
                    log::warn!("Frame {}: age classification failed: {e}", frame.index());
                    outcomes.push(FaceOutcome::Skipped {
                        detection,
                        reason: SkipReason::ClassificationFailed,
                    });
                }
            }
        }
        logger.timing("classify", t0.elapsed().as_secs_f64() * 1000.0);

        let report = FrameReport::new(outcomes);
        logger.frame_report(&report);
        Ok(report)
    }

    /// Like [`Self::annotate`]; errors name the failing stage.
    pub fn annotate_logged(
        &mut self,
        frame: &mut Frame,
        logger: &mut dyn PipelineLogger,
    ) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let report = self
            .process_logged(frame, logger)
            .map_err(|e| format!("face localization failed: {e}"))?;

        let t0 = Instant::now();
        self.renderer
            .render(frame, &report.annotations())
            .map_err(|e| format!("rendering failed: {e}"))?;
        logger.timing("render", t0.elapsed().as_secs_f64() * 1000.0);

        Ok(report)
    }
}
