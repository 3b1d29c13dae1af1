use ndarray::{Array4, ArrayD};

/// Black-box neural network: one NCHW input blob in, one tensor out.
///
/// Models are loaded once at startup and owned by the component that
/// interprets their output, so tests can swap in canned tensors.
pub trait InferenceModel: Send {
    fn infer(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>, Box<dyn std::error::Error>>;
}
