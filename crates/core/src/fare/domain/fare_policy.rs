//! Maps an age bucket to a fare concession and its display styling.

use std::fmt;

use crate::fare::domain::age_bucket::AgeBucket;

/// RGB display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

pub const DISCOUNT_FRAME: Color = Color([100, 255, 0]);
pub const DISCOUNT_AGE_LABEL: Color = Color([0, 255, 255]);
pub const DISCOUNT_STATUS_LABEL: Color = Color([100, 255, 0]);

pub const NO_DISCOUNT_FRAME: Color = Color([255, 0, 0]);
pub const NO_DISCOUNT_AGE_LABEL: Color = Color([255, 255, 0]);
pub const NO_DISCOUNT_STATUS_LABEL: Color = Color([255, 0, 0]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FareStatus {
    ChildDiscount,
    SeniorDiscount,
    NoDiscount,
}

impl FareStatus {
    pub fn message(self) -> &'static str {
        match self {
            FareStatus::ChildDiscount => "Child Discount Allowed",
            FareStatus::SeniorDiscount => "Senior Discount Allowed",
            FareStatus::NoDiscount => "No Discount",
        }
    }

    pub fn is_discount(self) -> bool {
        self != FareStatus::NoDiscount
    }
}

impl fmt::Display for FareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Eligibility outcome plus the colors used to draw it.
///
/// Colors are presentation only; nothing downstream branches on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FareDecision {
    pub status: FareStatus,
    pub frame_color: Color,
    pub age_label_color: Color,
    pub status_label_color: Color,
}

pub fn classify(bucket: AgeBucket) -> FareDecision {
    let status = match bucket {
        AgeBucket::Age0To2 | AgeBucket::Age4To6 | AgeBucket::Age8To12 => FareStatus::ChildDiscount,
        AgeBucket::Age60To100 => FareStatus::SeniorDiscount,
        AgeBucket::Age15To20 | AgeBucket::Age21To32 | AgeBucket::Age33To43 | AgeBucket::Age44To53 => {
            FareStatus::NoDiscount
        }
    };

    if status.is_discount() {
        FareDecision {
            status,
            frame_color: DISCOUNT_FRAME,
            age_label_color: DISCOUNT_AGE_LABEL,
            status_label_color: DISCOUNT_STATUS_LABEL,
        }
    } else {
        FareDecision {
            status,
            frame_color: NO_DISCOUNT_FRAME,
            age_label_color: NO_DISCOUNT_AGE_LABEL,
            status_label_color: NO_DISCOUNT_STATUS_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::infant(AgeBucket::Age0To2)]
    #[case::toddler(AgeBucket::Age4To6)]
    #[case::child(AgeBucket::Age8To12)]
    fn test_child_buckets_get_child_discount(#[case] bucket: AgeBucket) {
        assert_eq!(classify(bucket).status, FareStatus::ChildDiscount);
    }

    #[test]
    fn test_senior_bucket_gets_senior_discount() {
        assert_eq!(classify(AgeBucket::Age60To100).status, FareStatus::SeniorDiscount);
    }

    #[rstest]
    #[case(AgeBucket::Age15To20)]
    #[case(AgeBucket::Age21To32)]
    #[case(AgeBucket::Age33To43)]
    #[case(AgeBucket::Age44To53)]
    fn test_other_buckets_get_no_discount(#[case] bucket: AgeBucket) {
        let decision = classify(bucket);
        assert_eq!(decision.status, FareStatus::NoDiscount);
        assert_eq!(decision.frame_color, NO_DISCOUNT_FRAME);
        assert_eq!(decision.age_label_color, NO_DISCOUNT_AGE_LABEL);
        assert_eq!(decision.status_label_color, NO_DISCOUNT_STATUS_LABEL);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for bucket in AgeBucket::ALL {
            assert_eq!(classify(bucket), classify(bucket));
        }
    }

    #[test]
    fn test_discounts_share_styling() {
        let child = classify(AgeBucket::Age4To6);
        let senior = classify(AgeBucket::Age60To100);
        assert_eq!(child.frame_color, senior.frame_color);
        assert_eq!(child.age_label_color, DISCOUNT_AGE_LABEL);
        assert_eq!(senior.status_label_color, DISCOUNT_STATUS_LABEL);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(FareStatus::ChildDiscount.to_string(), "Child Discount Allowed");
        assert_eq!(FareStatus::SeniorDiscount.to_string(), "Senior Discount Allowed");
        assert_eq!(FareStatus::NoDiscount.to_string(), "No Discount");
    }
}
