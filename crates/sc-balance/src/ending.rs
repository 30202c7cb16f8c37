use std::collections::BTreeMap;

use sc_core::{AttributeMap, EndingCondition, RangeMap};

/// Index of the ending a player reaches with final attributes `values`.
///
/// Endings are checked in order and the first whose condition holds wins; if
/// none holds, the last ending is the fallback. Returns `None` only when
/// there are no endings.
pub fn select_ending(conditions: &[EndingCondition], values: &AttributeMap) -> Option<usize> {
    conditions
        .iter()
        .position(|condition| condition.is_met(values))
        .or_else(|| conditions.len().checked_sub(1))
}

/// Normalise final attribute values to 0–100 scores within their ranges.
///
/// Attributes without a known range are left out.
pub fn attribute_scores(values: &AttributeMap, ranges: &RangeMap) -> BTreeMap<String, u32> {
    values
        .iter()
        .filter_map(|(name, &value)| {
            ranges
                .get(name)
                .map(|range| (name.clone(), range.score(value)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::{AttributeRange, Threshold};

    fn values(pairs: &[(&str, i64)]) -> AttributeMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn first_satisfied_ending_wins() {
        let conditions = vec![
            EndingCondition::new().with("courage", Threshold::at_least(60)),
            EndingCondition::new().with("courage", Threshold::at_least(30)),
            EndingCondition::new(),
        ];
        assert_eq!(select_ending(&conditions, &values(&[("courage", 45)])), Some(1));
        assert_eq!(select_ending(&conditions, &values(&[("courage", 80)])), Some(0));
    }

    #[test]
    fn falls_back_to_last_ending() {
        let conditions = vec![
            EndingCondition::new().with("courage", Threshold::at_least(60)),
            EndingCondition::new().with("wisdom", Threshold::at_least(60)),
        ];
        assert_eq!(select_ending(&conditions, &values(&[])), Some(1));
        assert_eq!(select_ending(&[], &values(&[])), None);
    }

    #[test]
    fn scores_within_range() {
        let mut ranges = RangeMap::new();
        ranges.insert("勇气".to_string(), AttributeRange { min: 0, max: 10 });
        let scores = attribute_scores(&values(&[("勇气", 5), ("unknown", 3)]), &ranges);
        assert_eq!(scores.get("勇气"), Some(&50));
        assert!(!scores.contains_key("unknown"));
    }
}
