use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Result of asking a source for its next frame.
///
/// A failed acquisition is reported as `EndOfStream`, never as an error:
/// the loop treats both the same way and exits cleanly.
#[derive(Debug)]
pub enum Capture {
    Frame(Frame),
    EndOfStream,
}

/// Supplies frames from a camera device or a video file.
pub trait FrameSource: Send {
    /// Opens a device path or file and returns its properties.
    fn open(&mut self, source: &str) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Blocks until the next frame is decoded.
    fn next_frame(&mut self) -> Capture;

    /// Releases the device or file. Safe to call more than once.
    fn close(&mut self);
}
