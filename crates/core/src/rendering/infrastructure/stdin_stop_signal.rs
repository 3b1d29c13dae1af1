use std::io::BufRead;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::rendering::domain::stop_signal::StopSignal;

/// Stop key read from the terminal: the key followed by Enter.
///
/// A background thread blocks on stdin and signals through a channel
/// that the frame loop polls without blocking. If stdin closes, the
/// signal simply never fires.
pub struct StdinStopSignal {
    rx: Receiver<()>,
}

impl StdinStopSignal {
    pub fn spawn(stop_key: char) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let spawned = thread::Builder::new()
            .name("stop-key".to_string())
            .spawn(move || listen(std::io::stdin().lock(), stop_key, &tx));
        if let Err(e) = spawned {
            log::warn!("Could not listen for the stop key: {e}");
        }
        Self { rx }
    }

    fn from_receiver(rx: Receiver<()>) -> Self {
        Self { rx }
    }
}

impl StopSignal for StdinStopSignal {
    fn stop_requested(&self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

/// Reads lines until one is the stop key (case-insensitive), then signals.
fn listen<R: BufRead>(reader: R, stop_key: char, tx: &Sender<()>) {
    for line in reader.lines() {
        let Ok(line) = line else {
            return;
        };
        let mut chars = line.trim().chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.eq_ignore_ascii_case(&stop_key) {
                log::info!("Stop key pressed");
                let _ = tx.try_send(());
                return;
            }
        }
    }
}
