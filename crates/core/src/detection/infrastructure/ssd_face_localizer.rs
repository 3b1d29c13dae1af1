use crate::detection::domain::detection::Detection;
use crate::detection::domain::detection_tensor;
use crate::detection::domain::face_localizer::FaceLocalizer;
use crate::inference::domain::blob::blob_from_frame;
use crate::inference::domain::inference_model::InferenceModel;
use crate::shared::constants::{DETECTOR_INPUT_SIZE, DETECTOR_MEAN};
use crate::shared::frame::Frame;

/// Face localizer over the res10 SSD face detector.
///
/// One inference per frame at 350×350 with mean subtraction; boxes are
/// mapped back onto the original frame.
pub struct SsdFaceLocalizer {
    model: Box<dyn InferenceModel>,
}

impl SsdFaceLocalizer {
    pub fn new(model: Box<dyn InferenceModel>) -> Self {
        Self { model }
    }
}

impl FaceLocalizer for SsdFaceLocalizer {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }
        let blob = blob_from_frame(frame, DETECTOR_INPUT_SIZE, DETECTOR_MEAN);
        let output = self.model.infer(blob)?;
        let detections = detection_tensor::decode(&output, frame.width(), frame.height())?;
        log::trace!(
            "Frame {}: {} candidate faces",
            frame.index(),
            detections.len()
        );
        Ok(detections)
    }
}
