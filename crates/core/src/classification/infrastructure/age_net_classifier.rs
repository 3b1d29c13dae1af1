use crate::classification::domain::age_classifier::{select_bucket, AgeClassifier};
use crate::fare::domain::age_bucket::AgeBucket;
use crate::inference::domain::blob::blob_from_frame;
use crate::inference::domain::inference_model::InferenceModel;
use crate::shared::constants::{AGE_INPUT_SIZE, AGE_MEAN};
use crate::shared::frame::Frame;

/// Age classifier over the 8-way age network.
///
/// Each crop is resized to 227×227 with mean subtraction and run once.
pub struct AgeNetClassifier {
    model: Box<dyn InferenceModel>,
}

impl AgeNetClassifier {
    pub fn new(model: Box<dyn InferenceModel>) -> Self {
        Self { model }
    }
}

impl AgeClassifier for AgeNetClassifier {
    fn classify(&mut self, face: &Frame) -> Result<AgeBucket, Box<dyn std::error::Error>> {
        if face.is_empty() {
            return Err("cannot classify an empty face crop".into());
        }
        let blob = blob_from_frame(face, AGE_INPUT_SIZE, AGE_MEAN);
        let output = self.model.infer(blob)?;
        // [1, 8] in practice; flatten so any batch-of-one layout works.
        let probabilities: Vec<f32> = output.iter().copied().collect();
        Ok(select_bucket(&probabilities)?)
    }
}
