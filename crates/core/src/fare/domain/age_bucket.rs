use std::fmt;

/// Coarse age range assigned by the age classifier.
///
/// Variants are in model output order. The ranges are opaque labels fixed
/// by the classifier's training data; no numeric age maps onto them here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    Age0To2,
    Age4To6,
    Age8To12,
    Age15To20,
    Age21To32,
    Age33To43,
    Age44To53,
    Age60To100,
}

impl AgeBucket {
    pub const COUNT: usize = 8;

    pub const ALL: [AgeBucket; Self::COUNT] = [
        AgeBucket::Age0To2,
        AgeBucket::Age4To6,
        AgeBucket::Age8To12,
        AgeBucket::Age15To20,
        AgeBucket::Age21To32,
        AgeBucket::Age33To43,
        AgeBucket::Age44To53,
        AgeBucket::Age60To100,
    ];

    /// Bucket for a classifier output index, `None` past the last bucket.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Age0To2 => "(0-2)",
            AgeBucket::Age4To6 => "(4-6)",
            AgeBucket::Age8To12 => "(8-12)",
            AgeBucket::Age15To20 => "(15-20)",
            AgeBucket::Age21To32 => "(21-32)",
            AgeBucket::Age33To43 => "(33-43)",
            AgeBucket::Age44To53 => "(44-53)",
            AgeBucket::Age60To100 => "(60-100)",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips_through_all() {
        for (i, bucket) in AgeBucket::ALL.iter().enumerate() {
            assert_eq!(bucket.index(), i);
            assert_eq!(AgeBucket::from_index(i), Some(*bucket));
        }
    }

    #[test]
    fn test_from_index_out_of_range() {
        assert_eq!(AgeBucket::from_index(8), None);
    }

    #[test]
    fn test_labels_in_model_order() {
        let labels: Vec<_> = AgeBucket::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            [
                "(0-2)", "(4-6)", "(8-12)", "(15-20)", "(21-32)", "(33-43)", "(44-53)",
                "(60-100)"
            ]
        );
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(AgeBucket::Age21To32.to_string(), "(21-32)");
    }
}
