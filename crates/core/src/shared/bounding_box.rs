/// Axis-aligned box in pixel coordinates of the original frame.
///
/// Corners are `(x1, y1)` inclusive and `(x2, y2)` exclusive, the same
/// convention as a row/column slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Maps corners normalized to `[0, 1]` back onto a `width × height` frame.
    ///
    /// Scaling uses the original frame size, never the model input size.
    /// Coordinates are truncated toward zero and then clamped to the frame.
    pub fn from_normalized(corners: [f32; 4], width: u32, height: u32) -> Self {
        let [nx1, ny1, nx2, ny2] = corners;
        let scale = |v: f32, extent: u32| (v * extent as f32) as i32;
        Self::new(
            scale(nx1, width),
            scale(ny1, height),
            scale(nx2, width),
            scale(ny2, height),
        )
        .clamped(width, height)
    }

    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let w = width.min(i32::MAX as u32) as i32;
        let h = height.min(i32::MAX as u32) as i32;
        Self::new(
            self.x1.clamp(0, w),
            self.y1.clamp(0, h),
            self.x2.clamp(0, w),
            self.y2.clamp(0, h),
        )
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn is_degenerate(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }
}
