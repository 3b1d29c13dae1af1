use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::fare::domain::fare_policy::Color;
use crate::rendering::domain::annotation_renderer::AnnotationRenderer;
use crate::shared::annotation::Annotation;
use crate::shared::frame::Frame;

const BOX_THICKNESS: i32 = 2;
const TEXT_SCALE: f32 = 22.0;
/// Text tops relative to the box top: age label first, status under it.
const AGE_TEXT_OFFSET: i32 = 48;
const STATUS_TEXT_OFFSET: i32 = 26;

/// Fonts tried when no font file is given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Draws boxes and labels onto frames with imageproc.
///
/// Labels need a TrueType font. Without one, only boxes are drawn.
pub struct ImageprocRenderer {
    font: Option<FontVec>,
}

impl ImageprocRenderer {
    pub fn boxes_only() -> Self {
        Self { font: None }
    }

    pub fn with_font_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| format!("invalid font {}: {e}", path.display()))?;
        Ok(Self { font: Some(font) })
    }

    /// Uses the first readable system font, or falls back to boxes only.
    pub fn with_system_font() -> Self {
        for candidate in SYSTEM_FONTS {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            match Self::with_font_file(path) {
                Ok(renderer) => {
                    log::debug!("Using label font {candidate}");
                    return renderer;
                }
                Err(e) => log::debug!("Skipping font {candidate}: {e}"),
            }
        }
        log::warn!("No label font found, drawing boxes only (use --font to set one)");
        Self::boxes_only()
    }

    fn draw(&self, img: &mut RgbImage, annotation: &Annotation) {
        let bbox = annotation.bbox;
        let color = rgb(annotation.decision.frame_color);
        for inset in 0..BOX_THICKNESS {
            let w = bbox.width() - 2 * inset;
            let h = bbox.height() - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(bbox.x1 + inset, bbox.y1 + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(img, rect, color);
        }

        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(TEXT_SCALE);
        draw_text_mut(
            img,
            rgb(annotation.decision.age_label_color),
            bbox.x1,
            bbox.y1 - AGE_TEXT_OFFSET,
            scale,
            font,
            &annotation.age_text(),
        );
        draw_text_mut(
            img,
            rgb(annotation.decision.status_label_color),
            bbox.x1,
            bbox.y1 - STATUS_TEXT_OFFSET,
            scale,
            font,
            annotation.status_text(),
        );
    }
}

fn rgb(color: Color) -> Rgb<u8> {
    Rgb(color.0)
}

impl AnnotationRenderer for ImageprocRenderer {
    fn render(
        &self,
        frame: &mut Frame,
        annotations: &[Annotation],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if annotations.is_empty() || frame.is_empty() {
            return Ok(());
        }

        let mut img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        for annotation in annotations {
            self.draw(&mut img, annotation);
        }
        frame.data_mut().copy_from_slice(img.as_raw());
        Ok(())
    }
}
