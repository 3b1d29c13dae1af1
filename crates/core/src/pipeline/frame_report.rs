use crate::detection::domain::detection::Detection;
use crate::shared::annotation::Annotation;

/// Why a detection did not become an annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    BelowThreshold,
    /// The box had no area left after clamping to the frame.
    DegenerateBox,
    ClassificationFailed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FaceOutcome {
    Annotated(Annotation),
    Skipped {
        detection: Detection,
        reason: SkipReason,
    },
}

/// Per-frame result: one outcome per detection, in localizer order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    outcomes: Vec<FaceOutcome>,
}

impl FrameReport {
    pub fn new(outcomes: Vec<FaceOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[FaceOutcome] {
        &self.outcomes
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                FaceOutcome::Annotated(a) => Some(*a),
                FaceOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FaceOutcome::Skipped { reason: r, .. } if *r == reason))
            .count()
    }

    pub fn detection_count(&self) -> usize {
        self.outcomes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::domain::age_bucket::AgeBucket;
    use crate::fare::domain::fare_policy::classify;
    use crate::shared::bounding_box::BoundingBox;

    fn detection(confidence: f32) -> Detection {
        Detection {
            bbox: BoundingBox::new(0, 0, 10, 10),
            confidence,
        }
    }

    #[test]
    fn test_counts_by_outcome() {
        let annotation = Annotation {
            bbox: BoundingBox::new(0, 0, 10, 10),
            bucket: AgeBucket::Age0To2,
            decision: classify(AgeBucket::Age0To2),
        };
        let report = FrameReport::new(vec![
            FaceOutcome::Skipped {
                detection: detection(0.2),
                reason: SkipReason::BelowThreshold,
            },
            FaceOutcome::Annotated(annotation),
            FaceOutcome::Skipped {
                detection: detection(0.3),
                reason: SkipReason::BelowThreshold,
            },
            FaceOutcome::Skipped {
                detection: detection(0.9),
                reason: SkipReason::ClassificationFailed,
            },
        ]);

        assert_eq!(report.detection_count(), 4);
        assert_eq!(report.annotations(), vec![annotation]);
        assert_eq!(report.skipped(SkipReason::BelowThreshold), 2);
        assert_eq!(report.skipped(SkipReason::ClassificationFailed), 1);
        assert_eq!(report.skipped(SkipReason::DegenerateBox), 0);
    }

    #[test]
    fn test_default_is_empty() {
        let report = FrameReport::default();
        assert!(report.outcomes().is_empty());
        assert!(report.annotations().is_empty());
    }
}
