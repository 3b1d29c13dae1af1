use crate::shared::bounding_box::BoundingBox;

/// A candidate face location and the detector's confidence in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl Detection {
    /// Strictly above `threshold`; a score equal to it does not pass.
    pub fn passes(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}
