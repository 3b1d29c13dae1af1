use crate::detection::domain::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for finding candidate faces in a frame.
///
/// Returns every candidate the model reports, in model order and
/// unfiltered; confidence thresholding belongs to the caller.
pub trait FaceLocalizer: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
