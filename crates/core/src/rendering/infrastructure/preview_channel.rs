use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::rendering::domain::render_sink::RenderSink;
use crate::rendering::domain::stop_signal::StopSignal;
use crate::shared::frame::Frame;

/// Frames buffered between the validation loop and the display.
const PREVIEW_BUFFER: usize = 2;

/// Connects the validation loop to a display running on another thread.
///
/// The sink end never blocks: when the display falls behind, new frames
/// are dropped until it catches up. The display requests a stop through
/// the feed, and the loop polls it through [`PreviewStopSignal`].
pub fn preview_channel() -> (PreviewSink, PreviewFeed) {
    let (tx, rx) = crossbeam_channel::bounded(PREVIEW_BUFFER);
    let stop = Arc::new(AtomicBool::new(false));
    (PreviewSink { tx }, PreviewFeed { rx, stop })
}

pub struct PreviewSink {
    tx: Sender<Frame>,
}

impl RenderSink for PreviewSink {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        match self.tx.try_send(frame.clone()) {
            Ok(()) | Err(TrySendError::Full(_)) => Ok(()),
            // Display already closed; the stop flag ends the loop.
            Err(TrySendError::Disconnected(_)) => Ok(()),
        }
    }
}

/// Display side of [`preview_channel`].
#[derive(Clone)]
pub struct PreviewFeed {
    rx: Receiver<Frame>,
    stop: Arc<AtomicBool>,
}

impl PreviewFeed {
    /// Newest frame since the last call, discarding older ones.
    pub fn latest(&self) -> Option<Frame> {
        self.rx.try_iter().last()
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_signal(&self) -> PreviewStopSignal {
        PreviewStopSignal {
            stop: self.stop.clone(),
        }
    }
}

pub struct PreviewStopSignal {
    stop: Arc<AtomicBool>,
}

impl StopSignal for PreviewStopSignal {
    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize) -> Frame {
        Frame::new(vec![0; 12], 2, 2, index)
    }

    #[test]
    fn test_latest_returns_newest_frame() {
        let (mut sink, feed) = preview_channel();
        sink.show(&frame(0)).unwrap();
        sink.show(&frame(1)).unwrap();

        assert_eq!(feed.latest().map(|f| f.index()), Some(1));
        assert!(feed.latest().is_none());
    }

    #[test]
    fn test_slow_display_never_blocks_the_loop() {
        let (mut sink, feed) = preview_channel();
        for i in 0..10 {
            sink.show(&frame(i)).unwrap();
        }
        // Only the buffered frames survive.
        assert_eq!(feed.latest().map(|f| f.index()), Some(PREVIEW_BUFFER - 1));
    }

    #[test]
    fn test_show_after_display_closed_is_ok() {
        let (mut sink, feed) = preview_channel();
        drop(feed);
        assert!(sink.show(&frame(0)).is_ok());
        assert!(sink.close().is_ok());
    }

    #[test]
    fn test_stop_request_reaches_the_loop() {
        let (_sink, feed) = preview_channel();
        let signal = feed.stop_signal();
        assert!(!signal.stop_requested());

        feed.clone().request_stop();
        assert!(signal.stop_requested());
    }
}
