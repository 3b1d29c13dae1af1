use crate::fare::domain::age_bucket::AgeBucket;
use crate::inference::domain::tensor_layout_error::TensorLayoutError;
use crate::shared::frame::Frame;

/// Domain interface for assigning an age bucket to a cropped face.
///
/// Every successful call yields exactly one bucket; there is no
/// confidence cut-off at this stage.
pub trait AgeClassifier: Send {
    fn classify(&mut self, face: &Frame) -> Result<AgeBucket, Box<dyn std::error::Error>>;
}

/// Pick the most probable bucket.
///
/// Ties go to the lowest index, matching the usual argmax convention.
pub fn select_bucket(probabilities: &[f32]) -> Result<AgeBucket, TensorLayoutError> {
    let count_error = || TensorLayoutError::ProbabilityCount {
        expected: AgeBucket::COUNT,
        actual: probabilities.len(),
    };
    if probabilities.len() != AgeBucket::COUNT {
        return Err(count_error());
    }

    let best = probabilities
        .iter()
        .enumerate()
        .fold(0, |best, (i, &p)| if p > probabilities[best] { i } else { best });
    AgeBucket::from_index(best).ok_or_else(count_error)
}
