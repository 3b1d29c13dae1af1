use crate::shared::frame::Frame;

/// Destination for annotated frames (display, file, stream).
pub trait RenderSink: Send {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes and releases the sink. Default: nothing to release.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
