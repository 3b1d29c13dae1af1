pub const DETECTOR_MODEL_NAME: &str = "res10_300x300_ssd_iter_140000.onnx";
pub const AGE_MODEL_NAME: &str = "age_net.onnx";

/// Directory checked for models shipped next to the binary.
pub const BUNDLED_MODEL_DIR: &str = "model";

pub const DEFAULT_SOURCE: &str = "/dev/video0";

/// Detections must score strictly above this to be classified.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

pub const DETECTOR_INPUT_SIZE: u32 = 350;
pub const DETECTOR_MEAN: [f32; 3] = [104.0, 177.0, 123.0];

pub const AGE_INPUT_SIZE: u32 = 227;
pub const AGE_MEAN: [f32; 3] = [78.426_34, 87.768_91, 114.895_85];

pub const SNAPSHOT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];
