/// Non-blocking poll for an operator's request to stop the loop.
pub trait StopSignal: Send {
    fn stop_requested(&self) -> bool;
}

/// Never asks to stop; the loop runs until end of stream.
pub struct NeverStop;

impl StopSignal for NeverStop {
    fn stop_requested(&self) -> bool {
        false
    }
}
