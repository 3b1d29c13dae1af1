use crate::shared::annotation::Annotation;
use crate::shared::frame::Frame;

/// Draws fare annotations onto a frame in place.
///
/// Annotations are drawn in slice order, so later boxes paint over
/// earlier ones where they overlap.
pub trait AnnotationRenderer: Send {
    fn render(
        &self,
        frame: &mut Frame,
        annotations: &[Annotation],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
