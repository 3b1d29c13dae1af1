use crate::fare::domain::age_bucket::AgeBucket;
use crate::fare::domain::fare_policy::FareDecision;
use crate::shared::bounding_box::BoundingBox;

/// Everything needed to draw the fare decision for one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annotation {
    pub bbox: BoundingBox,
    pub bucket: AgeBucket,
    pub decision: FareDecision,
}

impl Annotation {
    pub fn age_text(&self) -> String {
        format!("Age Group: {}", self.bucket)
    }

    pub fn status_text(&self) -> &'static str {
        self.decision.status.message()
    }
}
