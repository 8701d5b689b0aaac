//! Deduplication and final inclusion filtering of the aggregated record set.
//!
//! Mirrors the dataframe pass of the upstream workflow: sort descending by the
//! configured keys, keep the first record per identity value ("most recent
//! wins"), then apply an optional substring inclusion filter.

use crate::config::IncludeFilter;
use crate::extract::Record;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Reduce `records` to at most one record per `identity_key` value.
///
/// The sort is descending over `sort_keys` in order; a record missing a sort
/// key ranks after every record that has it. The sort is stable, so ties keep
/// the canonical order produced by the aggregator; given the same record set
/// and keys, the output is identical regardless of task completion order.
/// Records missing the identity key cannot be grouped and are dropped. The
/// optional `include` filter then keeps only records whose named column
/// contains the configured substring.
pub fn select(
    records: Vec<Record>,
    identity_key: &str,
    sort_keys: &[String],
    include: Option<&IncludeFilter>,
) -> Vec<Record> {
    let mut records = records;
    records.sort_by(|a, b| compare_descending(a, b, sort_keys));

    let mut seen: HashSet<String> = HashSet::new();
    let mut selected: Vec<Record> = Vec::new();
    for record in records {
        let Some(identity) = record.get(identity_key) else {
            continue;
        };
        if seen.insert(identity.to_string()) {
            selected.push(record);
        }
    }

    match include {
        Some(filter) => selected
            .into_iter()
            .filter(|record| {
                record
                    .get(&filter.column)
                    .is_some_and(|value| value.contains(&filter.contains))
            })
            .collect(),
        None => selected,
    }
}

/// Descending comparison over the sort keys, missing values last.
fn compare_descending(a: &Record, b: &Record, sort_keys: &[String]) -> Ordering {
    for key in sort_keys {
        // Option ordering puts None first ascending, so comparing b to a
        // yields descending values with absent keys at the end.
        let ordering = b.get(key).cmp(&a.get(key));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TIMESTAMP_KEY;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut record = Record::new();
        for (key, value) in pairs {
            record.insert(key, value);
        }
        record
    }

    fn sort_keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn most_recent_record_wins_per_identity() {
        let records = vec![
            record(&[(TIMESTAMP_KEY, "2025-01-01 01:00:00"), ("user", "alice")]),
            record(&[(TIMESTAMP_KEY, "2025-01-01 03:00:00"), ("user", "alice")]),
            record(&[(TIMESTAMP_KEY, "2025-01-01 02:00:00"), ("user", "bob")]),
        ];

        let selected = select(records, "user", &sort_keys(&[TIMESTAMP_KEY]), None);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].get("user"), Some("alice"));
        assert_eq!(selected[0].get(TIMESTAMP_KEY), Some("2025-01-01 03:00:00"));
        assert_eq!(selected[1].get("user"), Some("bob"));
    }

    #[test]
    fn records_missing_identity_key_are_dropped() {
        let records = vec![
            record(&[(TIMESTAMP_KEY, "2025-01-01 01:00:00")]),
            record(&[(TIMESTAMP_KEY, "2025-01-01 02:00:00"), ("user", "alice")]),
        ];
        let selected = select(records, "user", &sort_keys(&[TIMESTAMP_KEY]), None);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].get("user"), Some("alice"));
    }

    #[test]
    fn records_missing_sort_key_rank_last() {
        let records = vec![
            record(&[("user", "no-timestamp")]),
            record(&[(TIMESTAMP_KEY, "2025-01-01 01:00:00"), ("user", "dated")]),
        ];
        let selected = select(records, "user", &sort_keys(&[TIMESTAMP_KEY]), None);
        assert_eq!(selected[0].get("user"), Some("dated"));
        assert_eq!(selected[1].get("user"), Some("no-timestamp"));
    }

    #[test]
    fn ties_keep_canonical_order() {
        // Same timestamp and identity: the stable sort keeps aggregate order,
        // so the record that came first wins.
        let first = record(&[
            (TIMESTAMP_KEY, "2025-01-01 01:00:00"),
            ("user", "alice"),
            ("seq", "1"),
        ]);
        let second = record(&[
            (TIMESTAMP_KEY, "2025-01-01 01:00:00"),
            ("user", "alice"),
            ("seq", "2"),
        ]);

        let selected = select(
            vec![first.clone(), second],
            "user",
            &sort_keys(&[TIMESTAMP_KEY]),
            None,
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].get("seq"), Some("1"));
    }

    #[test]
    fn selection_is_deterministic_for_fixed_input() {
        let records: Vec<Record> = (0..20)
            .map(|i| {
                record(&[
                    (TIMESTAMP_KEY, "2025-01-01 01:00:00"),
                    ("user", if i % 3 == 0 { "a" } else { "b" }),
                    ("seq", &i.to_string()),
                ])
            })
            .collect();

        let keys = sort_keys(&[TIMESTAMP_KEY, "user"]);
        let first = select(records.clone(), "user", &keys, None);
        let second = select(records, "user", &keys, None);
        assert_eq!(first, second);
    }

    #[test]
    fn include_filter_drops_non_matching_records() {
        let records = vec![
            record(&[("user", "inside"), ("nas", "10.65.1.5")]),
            record(&[("user", "outside"), ("nas", "10.235.8.83")]),
            record(&[("user", "no-nas")]),
        ];
        let filter = IncludeFilter {
            column: "nas".to_string(),
            contains: "10.65".to_string(),
        };
        let selected = select(records, "user", &sort_keys(&["user"]), Some(&filter));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].get("user"), Some("inside"));
    }

    #[test]
    fn empty_input_selects_nothing() {
        let selected = select(Vec::new(), "user", &sort_keys(&[TIMESTAMP_KEY]), None);
        assert!(selected.is_empty());
    }

    #[test]
    fn secondary_sort_key_breaks_primary_ties() {
        let records = vec![
            record(&[(TIMESTAMP_KEY, "2025-01-01 01:00:00"), ("user", "aaa")]),
            record(&[(TIMESTAMP_KEY, "2025-01-01 01:00:00"), ("user", "zzz")]),
        ];
        let selected = select(
            records,
            "user",
            &sort_keys(&[TIMESTAMP_KEY, "user"]),
            None,
        );
        // both survive (different identities); "zzz" sorts first descending
        assert_eq!(selected[0].get("user"), Some("zzz"));
        assert_eq!(selected[1].get("user"), Some("aaa"));
    }
}
