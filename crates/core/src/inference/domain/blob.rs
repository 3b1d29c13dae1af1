//! Image-to-tensor preprocessing shared by both networks.

use ndarray::Array4;

use crate::shared::frame::{Frame, CHANNELS};

/// Resize `frame` to `size × size` and subtract a per-channel mean.
///
/// Produces a `[1, 3, size, size]` float tensor with no further scaling.
/// Planes are B, G, R: the networks were trained on camera-native BGR
/// images, and `mean` is given in that same order.
pub fn blob_from_frame(frame: &Frame, size: u32, mean: [f32; 3]) -> Array4<f32> {
    let resized = frame.resized(size, size);
    let src = resized.as_ndarray();
    let s = size as usize;

    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, s, s));
    for y in 0..s {
        for x in 0..s {
            for (plane, &m) in mean.iter().enumerate() {
                let rgb_channel = CHANNELS - 1 - plane;
                tensor[[0, plane, y, x]] = src[[y, x, rgb_channel]] as f32 - m;
            }
        }
    }
    tensor
}
