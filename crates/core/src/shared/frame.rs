use image::imageops::FilterType;
use image::{ImageBuffer, Rgb};
use ndarray::ArrayView3;

use crate::shared::bounding_box::BoundingBox;

pub const CHANNELS: usize = 3;

/// A single captured frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the pipeline
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, CHANNELS),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels inside `bbox` into a new frame.
    ///
    /// The box is clamped to the frame first; returns `None` when nothing
    /// of it remains.
    pub fn crop(&self, bbox: &BoundingBox) -> Option<Frame> {
        let clamped = bbox.clamped(self.width, self.height);
        if clamped.is_degenerate() {
            return None;
        }

        let fw = self.width as usize;
        let x = clamped.x1 as usize;
        let y = clamped.y1 as usize;
        let w = clamped.width() as usize;
        let h = clamped.height() as usize;

        let mut pixels = Vec::with_capacity(w * h * CHANNELS);
        for row in y..y + h {
            let start = (row * fw + x) * CHANNELS;
            pixels.extend_from_slice(&self.data[start..start + w * CHANNELS]);
        }
        Some(Frame::new(pixels, w as u32, h as u32, self.index))
    }

    /// Bilinear resize to `width × height`.
    pub fn resized(&self, width: u32, height: u32) -> Frame {
        if self.width == width && self.height == height {
            return self.clone();
        }
        let view: ImageBuffer<Rgb<u8>, &[u8]> =
            ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
                .expect("Frame data length must match dimensions");
        let resized = image::imageops::resize(&view, width, height, FilterType::Triangle);
        Frame::new(resized.into_raw(), width, height, self.index)
    }
}
