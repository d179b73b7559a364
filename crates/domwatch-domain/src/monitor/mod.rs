use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

/// Ordered set of distinct, non-negative day counts at which a warning fires.
///
/// Matching is exact equality: a countdown that jumps over a threshold
/// between two checks does not fire for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct AlertThresholds(Vec<i64>);

impl AlertThresholds {
    pub fn new(days: Vec<i64>) -> Result<Self, DomainError> {
        if let Some(negative) = days.iter().find(|d| **d < 0) {
            return Err(DomainError::Validation(format!(
                "Alert threshold cannot be negative: {}",
                negative
            )));
        }
        for (index, day) in days.iter().enumerate() {
            if days[..index].contains(day) {
                return Err(DomainError::Validation(format!(
                    "Duplicate alert threshold: {}",
                    day
                )));
            }
        }
        Ok(Self(days))
    }

    /// Parse the comma-separated persisted form (`"30, 14,7,1"`).
    ///
    /// Unparsable, negative and repeated entries are skipped; fails only when
    /// nothing usable is left.
    pub fn parse_list(raw: &str) -> Result<Self, DomainError> {
        let mut days: Vec<i64> = Vec::new();
        for token in raw.split(',') {
            match token.trim().parse::<i64>() {
                Ok(day) if day >= 0 && !days.contains(&day) => days.push(day),
                _ => continue,
            }
        }

        if days.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "No valid alert thresholds in '{}'",
                raw
            )));
        }
        Ok(Self(days))
    }

    /// First threshold, in configured order, exactly equal to the countdown
    pub fn first_match(&self, days_remaining: i64) -> Option<i64> {
        self.0.iter().copied().find(|t| *t == days_remaining)
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self(vec![30, 14, 7, 1])
    }
}

impl TryFrom<Vec<i64>> for AlertThresholds {
    type Error = DomainError;

    fn try_from(days: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<AlertThresholds> for Vec<i64> {
    fn from(thresholds: AlertThresholds) -> Self {
        thresholds.0
    }
}
