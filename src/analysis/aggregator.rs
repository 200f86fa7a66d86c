//! Label normalization and frequency aggregation.
//!
//! Raw verdict flags arrive in inconsistent casing, with stray whitespace
//! and the occasional misspelling. This module cleans them into canonical
//! labels and produces the ordered frequency table used for charting.

use crate::models::{LabelCount, Record};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Known misspellings and their canonical label.
const LABEL_ALIASES: &[(&str, &str)] = &[("SATIR", "SATIRE")];

/// Two parallel sequences ready to hand to the chart renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSeries {
    /// Display labels of the form `"<LABEL> (<count>)"`.
    pub labels: Vec<String>,
    /// Raw counts, in the same order as `labels`.
    pub values: Vec<usize>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Resolve a cleaned label through the alias table.
fn resolve_alias(label: String) -> String {
    LABEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(label)
}

/// Normalize a raw flag.
///
/// Returns `None` for a missing or empty flag. Whitespace-only flags are not
/// rejected here; they normalize to the empty string.
pub fn normalize_flag(flag: Option<&str>) -> Option<String> {
    let flag = flag.filter(|f| !f.is_empty())?;
    let cleaned = flag.to_uppercase().trim().to_string();
    Some(resolve_alias(cleaned))
}

/// Normalize a raw flag, also rejecting labels that end up empty.
pub fn clean_label(flag: Option<&str>) -> Option<String> {
    normalize_flag(flag).filter(|label| !label.is_empty())
}

/// Aggregate records into label counts.
///
/// Output is sorted by count descending, ties broken by label ascending.
/// Records whose flag is missing or blank are not counted.
pub fn aggregate(records: &[Record]) -> Vec<LabelCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        if let Some(label) = clean_label(record.flag.as_deref()) {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut label_counts: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();

    label_counts.sort_by(|a, b| {
        Reverse(a.count)
            .cmp(&Reverse(b.count))
            .then_with(|| a.label.cmp(&b.label))
    });

    label_counts
}

/// Split label counts into the display labels and values the chart expects.
pub fn chart_series(label_counts: &[LabelCount]) -> ChartSeries {
    ChartSeries {
        labels: label_counts.iter().map(|lc| lc.to_string()).collect(),
        values: label_counts.iter().map(|lc| lc.count).collect(),
    }
}

/// Total number of labeled records represented by the counts.
pub fn total_labeled(label_counts: &[LabelCount]) -> usize {
    label_counts.iter().map(|lc| lc.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(values: &[Option<&str>]) -> Vec<Record> {
        values.iter().map(|f| Record::new(*f, "body")).collect()
    }

    fn lc(label: &str, count: usize) -> LabelCount {
        LabelCount {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_case_and_whitespace_merge() {
        let records = flags(&[Some("hoax"), Some("HOAX"), Some("Hoax ")]);
        assert_eq!(aggregate(&records), vec![lc("HOAX", 3)]);
    }

    #[test]
    fn test_satire_alias() {
        let records = flags(&[Some("SATIR"), Some("satire")]);
        assert_eq!(aggregate(&records), vec![lc("SATIRE", 2)]);
    }

    #[test]
    fn test_alias_applies_after_trim() {
        let records = flags(&[Some("  satir\t")]);
        assert_eq!(aggregate(&records), vec![lc("SATIRE", 1)]);
    }

    #[test]
    fn test_missing_and_empty_flags_dropped() {
        let records = flags(&[Some(""), None]);
        assert!(aggregate(&records).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_descending_order() {
        let records = flags(&[Some("A"), Some("A"), Some("B")]);
        assert_eq!(aggregate(&records), vec![lc("A", 2), lc("B", 1)]);
    }

    #[test]
    fn test_ties_broken_by_label() {
        let records = flags(&[Some("MISLEADING"), Some("HOAX"), Some("SATIRE"), Some("HOAX")]);
        assert_eq!(
            aggregate(&records),
            vec![lc("HOAX", 2), lc("MISLEADING", 1), lc("SATIRE", 1)]
        );
    }

    #[test]
    fn test_whitespace_only_flag() {
        // passes the emptiness check but trims away to nothing
        assert_eq!(normalize_flag(Some("   ")), Some(String::new()));
        assert_eq!(clean_label(Some("   ")), None);

        let records = flags(&[Some("   "), Some("hoax")]);
        assert_eq!(aggregate(&records), vec![lc("HOAX", 1)]);
    }

    #[test]
    fn test_sum_matches_non_blank_flags() {
        let raw = [
            Some("hoax"),
            None,
            Some("Misleading"),
            Some(""),
            Some("SATIR"),
            Some(" "),
            Some("HOAX"),
            Some("satire "),
        ];
        let records = flags(&raw);
        let expected = raw
            .iter()
            .filter(|f| f.map(|s| !s.trim().is_empty()).unwrap_or(false))
            .count();

        let counts = aggregate(&records);
        assert_eq!(total_labeled(&counts), expected);

        let mut labels: Vec<_> = counts.iter().map(|c| c.label.clone()).collect();
        labels.dedup();
        assert_eq!(labels.len(), counts.len());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let records = flags(&[
            Some("hoax"),
            Some("Satir"),
            Some(" misleading"),
            Some("HOAX"),
        ]);
        let first = aggregate(&records);

        let relabeled: Vec<Record> = first
            .iter()
            .map(|c| Record::new(Some(c.label.as_str()), ""))
            .collect();
        let second = aggregate(&relabeled);

        let first_labels: Vec<_> = first.iter().map(|c| &c.label).collect();
        let mut second_labels: Vec<_> = second.iter().map(|c| &c.label).collect();
        second_labels.sort();
        let mut sorted_first = first_labels.clone();
        sorted_first.sort();
        assert_eq!(sorted_first, second_labels);

        for count in &first {
            assert_eq!(normalize_flag(Some(count.label.as_str())).as_ref(), Some(&count.label));
        }
    }

    #[test]
    fn test_chart_series() {
        let series = chart_series(&[lc("HOAX", 5), lc("SATIRE", 2)]);
        assert_eq!(series.labels, vec!["HOAX (5)", "SATIRE (2)"]);
        assert_eq!(series.values, vec![5, 2]);
        assert!(!series.is_empty());
        assert!(chart_series(&[]).is_empty());
    }
}
