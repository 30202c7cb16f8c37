use std::collections::BTreeSet;

use sc_core::{AttributeMap, AttributeRange, Choice, ParsedChapter, RangeMap};

/// Folds decision points into per-attribute `[min, max]` ranges.
///
/// Each decision point widens the range of every attribute any of its choices
/// mentions by the smallest and largest delta on offer, with unmentioned
/// attributes counting as a 0 delta. Because the fold is a sum of independent
/// per-decision extremes, the result does not depend on decision order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRangeCalculator {
    ranges: RangeMap,
}

impl AttributeRangeCalculator {
    /// Seed every initial attribute at `[v, v]`.
    pub fn new(initial: &AttributeMap) -> Self {
        Self {
            ranges: initial
                .iter()
                .map(|(name, &value)| (name.clone(), AttributeRange::point(value)))
                .collect(),
        }
    }

    /// Fold in one decision point.
    pub fn add_decision(&mut self, choices: &[Choice]) {
        let attributes: BTreeSet<&str> = choices
            .iter()
            .flat_map(|c| c.attributes_delta.keys().map(String::as_str))
            .collect();

        for attribute in attributes {
            let deltas = choices.iter().map(|c| c.delta(attribute));
            let min = deltas.clone().min().unwrap_or(0);
            let max = deltas.max().unwrap_or(0);
            self.ranges
                .entry(attribute.to_string())
                .or_insert_with(|| AttributeRange::point(0))
                .extend(min, max);
        }
    }

    /// Fold in every decision point of a chapter, in reading order.
    pub fn add_chapter(&mut self, chapter: &ParsedChapter) {
        for choices in chapter.decision_points() {
            self.add_decision(choices);
        }
    }

    /// The ranges accumulated so far.
    pub fn ranges(&self) -> &RangeMap {
        &self.ranges
    }

    /// Consume the calculator and return the ranges.
    pub fn finish(self) -> RangeMap {
        self.ranges
    }
}

/// Compute attribute ranges over a full chapter history.
pub fn calculate_ranges(initial: &AttributeMap, chapters: &[ParsedChapter]) -> RangeMap {
    let mut calculator = AttributeRangeCalculator::new(initial);
    for chapter in chapters {
        calculator.add_chapter(chapter);
    }
    calculator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::{Dialogue, Scene};

    fn chapter(decisions: Vec<Vec<Choice>>) -> ParsedChapter {
        ParsedChapter {
            chapter_index: 1,
            title: "t".to_string(),
            scenes: vec![Scene {
                id: 1,
                dialogues: decisions
                    .into_iter()
                    .map(|choices| Dialogue::with_choices("n", choices))
                    .collect(),
                span: 0..0,
            }],
        }
    }

    fn initial(pairs: &[(&str, i64)]) -> AttributeMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn single_decision_widens_range() {
        let ch = chapter(vec![vec![
            Choice::new(1, "A", "a").with_delta("courage", 5),
            Choice::new(2, "B", "b").with_delta("courage", -2),
        ]]);
        let ranges = calculate_ranges(&initial(&[("courage", 10)]), &[ch]);
        assert_eq!(ranges["courage"], AttributeRange { min: 8, max: 15 });
    }

    #[test]
    fn unmentioned_attribute_counts_as_zero() {
        let ch = chapter(vec![vec![
            Choice::new(1, "A", "a").with_delta("courage", 2),
            Choice::new(2, "B", "b").with_delta("wisdom", 1),
        ]]);
        let ranges = calculate_ranges(&AttributeMap::new(), &[ch]);
        assert_eq!(ranges["courage"], AttributeRange { min: 0, max: 2 });
        assert_eq!(ranges["wisdom"], AttributeRange { min: 0, max: 1 });
    }

    #[test]
    fn untouched_initial_attribute_stays_a_point() {
        let ranges = calculate_ranges(&initial(&[("charm", 5)]), &[]);
        assert_eq!(ranges["charm"], AttributeRange::point(5));
    }

    #[test]
    fn accumulates_across_chapters() {
        let first = chapter(vec![vec![
            Choice::new(1, "A", "a").with_delta("courage", 1),
            Choice::new(2, "B", "b").with_delta("courage", -1),
        ]]);
        let second = chapter(vec![vec![
            Choice::new(1, "A", "a").with_delta("courage", 3),
            Choice::new(2, "B", "b"),
        ]]);
        let ranges = calculate_ranges(&initial(&[("courage", 0)]), &[first, second]);
        assert_eq!(ranges["courage"], AttributeRange { min: -1, max: 4 });
    }

    #[test]
    fn narration_only_dialogues_are_ignored() {
        let mut ch = chapter(vec![]);
        ch.scenes[0].dialogues.push(Dialogue::narration("quiet"));
        let ranges = calculate_ranges(&initial(&[("courage", 3)]), &[ch]);
        assert_eq!(ranges["courage"], AttributeRange::point(3));
    }
}
