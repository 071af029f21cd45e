/// Weight applied to a word's best match found anywhere in the transcript,
/// relative to a match at the word's own position.
pub const DEFAULT_POSITION_DISCOUNT: f64 = 0.8;

/// Tunable parameters of the word aligner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub position_discount: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            position_discount: DEFAULT_POSITION_DISCOUNT,
        }
    }
}

impl ScoringConfig {
    pub fn with_position_discount(mut self, discount: f64) -> Self {
        self.position_discount = discount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_discount() {
        assert_eq!(ScoringConfig::default().position_discount, 0.8);
    }

    #[test]
    fn test_with_position_discount() {
        let config = ScoringConfig::default().with_position_discount(1.0);
        assert_eq!(config.position_discount, 1.0);
    }
}
