use std::collections::{BTreeMap, HashSet};

use crate::model::{Location, PriceChange, PriceRecord};
use crate::patterns::normalize_label;

/// Identity of a priced cell across versions, independent of table position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PriceSignature {
    pub item_id: String,
    pub column_label: String,
}

impl PriceSignature {
    /// `None` for records without an item id; those cannot be matched.
    pub fn of(record: &PriceRecord) -> Option<Self> {
        let item_id = record.item_id.as_ref()?;
        Some(Self {
            item_id: item_id.clone(),
            column_label: normalize_label(&record.column_label),
        })
    }
}

fn document_order(r: &PriceRecord) -> (u32, usize, usize, usize) {
    (r.page, r.table_index, r.row_index, r.col_index)
}

fn group_by_signature(records: &[PriceRecord]) -> BTreeMap<PriceSignature, Vec<&PriceRecord>> {
    let mut groups: BTreeMap<PriceSignature, Vec<&PriceRecord>> = BTreeMap::new();
    for r in records {
        if let Some(sig) = PriceSignature::of(r) {
            groups.entry(sig).or_default().push(r);
        }
    }
    for entries in groups.values_mut() {
        entries.sort_by_key(|r| document_order(r));
    }
    groups
}

/// Match prices across two documents by signature and report every pair whose
/// price differs.
///
/// Within a signature, entries are paired in document order; surplus entries
/// on either side are ignored, as are signatures present on one side only.
/// Output is in new-document order.
pub fn match_prices(old: &[PriceRecord], new: &[PriceRecord]) -> Vec<PriceChange> {
    let old_map = group_by_signature(old);
    let new_map = group_by_signature(new);

    let mut seen: HashSet<(String, String, Location)> = HashSet::new();
    let mut changes = Vec::new();

    for (sig, old_entries) in &old_map {
        let Some(new_entries) = new_map.get(sig) else {
            continue;
        };
        for (old_p, new_p) in old_entries.iter().zip(new_entries.iter()) {
            if old_p.price_cents == new_p.price_cents {
                continue;
            }
            let key = (sig.item_id.clone(), sig.column_label.clone(), new_p.location());
            if !seen.insert(key) {
                continue;
            }
            changes.push(price_change(sig, old_p, new_p));
        }
    }

    let old_only = old_map.keys().filter(|k| !new_map.contains_key(*k)).count();
    let new_only = new_map.keys().filter(|k| !old_map.contains_key(*k)).count();
    tracing::debug!(
        signatures_old = old_map.len(),
        signatures_new = new_map.len(),
        old_only,
        new_only,
        changes = changes.len(),
        "matched price signatures"
    );

    changes.sort_by_key(|c| {
        let l = c.new_location;
        (l.page, l.table, l.row, l.col)
    });
    changes
}

fn price_change(sig: &PriceSignature, old: &PriceRecord, new: &PriceRecord) -> PriceChange {
    let difference_cents = new.price_cents - old.price_cents;
    let percent_change = if old.price_cents > 0 {
        difference_cents as f64 / old.price_cents as f64 * 100.0
    } else {
        0.0
    };
    PriceChange {
        item_id: sig.item_id.clone(),
        column_label: sig.column_label.clone(),
        item_description: new
            .item_description
            .clone()
            .or_else(|| old.item_description.clone()),
        old_price_cents: old.price_cents,
        new_price_cents: new.price_cents,
        difference_cents,
        percent_change,
        old_location: old.location(),
        new_location: new.location(),
        old_raw_text: old.raw_text.clone(),
        new_raw_text: new.raw_text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(table: usize, row: usize, col: usize, id: Option<&str>, label: &str, cents: i64) -> PriceRecord {
        PriceRecord {
            table_index: table,
            page: 1,
            row_index: row,
            col_index: col,
            item_id: id.map(str::to_string),
            item_description: Some("Short notice cancellation".into()),
            price_cents: cents,
            raw_text: format!("${}.{:02}", cents / 100, cents % 100),
            column_label: label.into(),
        }
    }

    #[test]
    fn unchanged_prices_produce_nothing() {
        let old = vec![rec(0, 1, 2, Some("01_011"), "national", 100)];
        assert!(match_prices(&old, &old).is_empty());
    }

    #[test]
    fn moved_table_still_matches() {
        let old = vec![rec(2, 1, 2, Some("01_011"), "national", 100)];
        let new = vec![rec(7, 4, 3, Some("01_011"), "national", 100)];
        assert!(match_prices(&old, &new).is_empty());

        let new = vec![rec(7, 4, 3, Some("01_011"), "national", 150)];
        let changes = match_prices(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_location.table, 2);
        assert_eq!(changes[0].new_location.table, 7);
        assert_eq!(changes[0].difference_cents, 50);
        assert!((changes[0].percent_change - 50.0).abs() < 1e-9);
    }

    #[test]
    fn label_is_case_and_space_insensitive() {
        let old = vec![rec(0, 1, 2, Some("01_011"), "Very  Remote", 100)];
        let new = vec![rec(0, 1, 2, Some("01_011"), "very remote", 90)];
        let changes = match_prices(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].column_label, "very remote");
        assert_eq!(changes[0].difference_cents, -10);
    }

    #[test]
    fn one_sided_and_unkeyed_records_ignored() {
        let old = vec![
            rec(0, 1, 2, Some("01_011"), "national", 100),
            rec(0, 2, 2, None, "national", 5),
        ];
        let new = vec![
            rec(0, 1, 2, Some("02_022"), "national", 100),
            rec(0, 2, 2, None, "national", 6),
        ];
        assert!(match_prices(&old, &new).is_empty());
    }

    #[test]
    fn duplicates_pair_in_document_order() {
        let old = vec![
            rec(1, 5, 2, Some("01_011"), "national", 300),
            rec(1, 2, 2, Some("01_011"), "national", 100),
        ];
        let new = vec![
            rec(0, 2, 2, Some("01_011"), "national", 110),
            rec(0, 9, 2, Some("01_011"), "national", 300),
            rec(0, 12, 2, Some("01_011"), "national", 999),
        ];
        let changes = match_prices(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_price_cents, 100);
        assert_eq!(changes[0].new_price_cents, 110);
    }

    #[test]
    fn zero_old_price_has_zero_percent() {
        let old = vec![rec(0, 1, 2, Some("01_011"), "national", 0)];
        let new = vec![rec(0, 1, 2, Some("01_011"), "national", 500)];
        let changes = match_prices(&old, &new);
        assert_eq!(changes[0].percent_change, 0.0);
        assert_eq!(changes[0].difference_cents, 500);
    }
}
