use std::path::Path;

use ndarray::{Array4, ArrayD};
use ort::execution_providers::ExecutionProviderDispatch;

use crate::inference::domain::inference_model::InferenceModel;

/// [`InferenceModel`] backed by an ONNX Runtime session.
///
/// The session is built once from a model file; a missing or invalid file
/// fails here, before any frame is processed.
pub struct OnnxModel {
    session: ort::session::Session,
    name: String,
}

impl OnnxModel {
    pub fn load(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (backend, providers) = accelerators();
        log::debug!("Loading model {name} ({backend})");

        let session = ort::session::Session::builder()?
            .with_execution_providers(providers)?
            .commit_from_file(model_path)
            .map_err(|e| format!("Failed to load model {name}: {e}"))?;
        Ok(Self { session, name })
    }
}

/// Hardware backend requested for this platform. ONNX Runtime falls back
/// to CPU when a provider cannot be registered.
fn accelerators() -> (&'static str, Vec<ExecutionProviderDispatch>) {
    #[cfg(target_os = "macos")]
    {
        (
            "CoreML",
            vec![ort::execution_providers::CoreMLExecutionProvider::default().build()],
        )
    }
    #[cfg(target_os = "windows")]
    {
        (
            "DirectML",
            vec![ort::execution_providers::DirectMLExecutionProvider::default().build()],
        )
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        ("CPU", vec![])
    }
}

impl InferenceModel for OnnxModel {
    fn infer(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err(format!("Model {} produced no outputs", self.name).into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        Ok(tensor.to_owned())
    }
}
