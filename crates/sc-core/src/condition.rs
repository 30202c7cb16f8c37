use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeMap;
use crate::error::CoreError;

/// Comparison operator of a threshold predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `>=`
    AtLeast,
    /// `<=`
    AtMost,
}

impl Comparison {
    /// The operator as written in condition strings.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
        }
    }
}

/// A numeric predicate on one attribute, e.g. `>=60`.
///
/// Serialized in its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Threshold {
    /// The comparison operator.
    pub comparison: Comparison,
    /// The value compared against.
    pub value: i64,
}

impl Threshold {
    /// `>= value`
    pub fn at_least(value: i64) -> Self {
        Self {
            comparison: Comparison::AtLeast,
            value,
        }
    }

    /// `<= value`
    pub fn at_most(value: i64) -> Self {
        Self {
            comparison: Comparison::AtMost,
            value,
        }
    }

    /// Whether `actual` satisfies the predicate.
    pub fn is_met(&self, actual: i64) -> bool {
        match self.comparison {
            Comparison::AtLeast => actual >= self.value,
            Comparison::AtMost => actual <= self.value,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.comparison.symbol(), self.value)
    }
}

impl FromStr for Threshold {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (comparison, rest) = if let Some(rest) = trimmed.strip_prefix(">=") {
            (Comparison::AtLeast, rest)
        } else if let Some(rest) = trimmed.strip_prefix("<=") {
            (Comparison::AtMost, rest)
        } else {
            return Err(CoreError::InvalidThreshold(s.to_string()));
        };
        let value = rest
            .trim()
            .parse::<i64>()
            .map_err(|_| CoreError::InvalidThreshold(s.to_string()))?;
        Ok(Self { comparison, value })
    }
}

impl TryFrom<String> for Threshold {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Threshold> for String {
    fn from(t: Threshold) -> Self {
        t.to_string()
    }
}

/// Resolved numeric predicates for one ending, keyed by attribute name.
///
/// Serialized as a plain map, e.g. `{"courage": ">=60"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndingCondition {
    /// Attribute name → predicate.
    pub thresholds: BTreeMap<String, Threshold>,
}

impl EndingCondition {
    /// An empty condition, satisfied by every attribute state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    pub fn with(mut self, attribute: impl Into<String>, threshold: Threshold) -> Self {
        self.thresholds.insert(attribute.into(), threshold);
        self
    }

    /// The predicate for `attribute`, if any.
    pub fn get(&self, attribute: &str) -> Option<&Threshold> {
        self.thresholds.get(attribute)
    }

    /// Returns `true` if no predicate was resolved.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether every predicate holds. Attributes missing from `values` count as 0.
    pub fn is_met(&self, values: &AttributeMap) -> bool {
        self.thresholds
            .iter()
            .all(|(name, t)| t.is_met(values.get(name).copied().unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_display_and_parse() {
        assert_eq!(Threshold::at_least(60).to_string(), ">=60");
        assert_eq!(Threshold::at_most(-4).to_string(), "<=-4");
        assert_eq!(">= 12".parse::<Threshold>().unwrap(), Threshold::at_least(12));
        assert_eq!("<=40".parse::<Threshold>().unwrap(), Threshold::at_most(40));
        assert!("=40".parse::<Threshold>().is_err());
        assert!(">=abc".parse::<Threshold>().is_err());
    }

    #[test]
    fn threshold_evaluation() {
        assert!(Threshold::at_least(60).is_met(60));
        assert!(!Threshold::at_least(60).is_met(59));
        assert!(Threshold::at_most(40).is_met(40));
        assert!(!Threshold::at_most(40).is_met(41));
    }

    #[test]
    fn ending_condition_serializes_as_string_map() {
        let cond = EndingCondition::new()
            .with("courage", Threshold::at_least(60))
            .with("wisdom", Threshold::at_most(40));
        let json = serde_json::to_string(&cond).unwrap();
        assert_eq!(json, r#"{"courage":">=60","wisdom":"<=40"}"#);
        let back: EndingCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cond);
    }

    #[test]
    fn ending_condition_rejects_bad_threshold_json() {
        assert!(serde_json::from_str::<EndingCondition>(r#"{"courage":"high"}"#).is_err());
    }

    #[test]
    fn ending_condition_evaluation() {
        let cond = EndingCondition::new()
            .with("courage", Threshold::at_least(5))
            .with("wisdom", Threshold::at_most(0));
        let mut values = AttributeMap::new();
        values.insert("courage".to_string(), 7);
        assert!(cond.is_met(&values));
        values.insert("wisdom".to_string(), 2);
        assert!(!cond.is_met(&values));
        assert!(EndingCondition::new().is_met(&AttributeMap::new()));
    }
}
