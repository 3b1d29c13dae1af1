use std::path::{Path, PathBuf};

use crate::rendering::domain::render_sink::RenderSink;
use crate::shared::frame::Frame;

/// Keeps an image file on disk showing the most recent annotated frame.
///
/// Each frame is written to a sibling temp file and renamed over the
/// target, so a viewer polling the file never sees a partial image.
pub struct ImageSnapshotSink {
    path: PathBuf,
    temp_path: PathBuf,
}

impl ImageSnapshotSink {
    pub fn new(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        Self {
            path: path.to_path_buf(),
            temp_path: path.with_extension(format!("part.{ext}")),
        }
    }
}

impl RenderSink for ImageSnapshotSink {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save(&self.temp_path)?;
        std::fs::rename(&self.temp_path, &self.path)?;
        Ok(())
    }
}
