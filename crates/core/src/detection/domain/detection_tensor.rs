//! Output layout of the SSD face detector.
//!
//! The network emits a `[1, 1, N, 7]` tensor. Each of the `N` rows is
//! `[image_id, class_id, confidence, x1, y1, x2, y2]` with the corners
//! normalized to `[0, 1]` relative to the input image.

use ndarray::{ArrayD, Ix4};

use crate::detection::domain::detection::Detection;
use crate::inference::domain::tensor_layout_error::TensorLayoutError;
use crate::shared::bounding_box::BoundingBox;

pub const FIELDS_PER_DETECTION: usize = 7;
pub const CONFIDENCE_FIELD: usize = 2;
pub const FIRST_CORNER_FIELD: usize = 3;

/// Decode every row into a [`Detection`] on a `width × height` frame.
///
/// Boxes are denormalized with the original frame size and clamped to it;
/// a degenerate result is kept so the caller can account for it.
pub fn decode(
    output: &ArrayD<f32>,
    width: u32,
    height: u32,
) -> Result<Vec<Detection>, TensorLayoutError> {
    let shape_err = || TensorLayoutError::DetectionShape(output.shape().to_vec());
    let view = output
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| shape_err())?;
    let (batch, channels, rows, fields) = view.dim();
    if batch != 1 || channels != 1 || fields != FIELDS_PER_DETECTION {
        return Err(shape_err());
    }

    let detections = (0..rows)
        .map(|i| {
            let corner = |k: usize| view[[0, 0, i, FIRST_CORNER_FIELD + k]];
            Detection {
                bbox: BoundingBox::from_normalized(
                    [corner(0), corner(1), corner(2), corner(3)],
                    width,
                    height,
                ),
                confidence: view[[0, 0, i, CONFIDENCE_FIELD]],
            }
        })
        .collect();
    Ok(detections)
}
