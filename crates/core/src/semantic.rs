use crate::model::{GuidanceRecord, Paragraph, RuleRecord, Table};
use crate::result::{Dimensions, RecordChange, TableChanges, TableShapeChange};
use crate::similarity::{CandidateSet, TextSimilarity};

/// A record matched across versions by its text alone.
pub trait TextRecord {
    fn text(&self) -> &str;
}

impl TextRecord for RuleRecord {
    fn text(&self) -> &str {
        &self.text
    }
}

impl TextRecord for GuidanceRecord {
    fn text(&self) -> &str {
        &self.text
    }
}

impl TextRecord for Paragraph {
    fn text(&self) -> &str {
        &self.text
    }
}

/// Fuzzy diff of two record lists.
///
/// Each old record takes its best new candidate at or above `threshold`:
/// an imperfect match is `Modified`, no match is `Removed`. New records with
/// no eligible old candidate are `Added`. Matching is not one-to-one, so two
/// old records may both resolve to the same new record.
pub fn diff_records<T>(
    old: &[T],
    new: &[T],
    threshold: u8,
    metric: &dyn TextSimilarity,
) -> Vec<RecordChange<T>>
where
    T: TextRecord + Clone,
{
    let old_set = CandidateSet::new(old.iter().map(TextRecord::text).collect());
    let new_set = CandidateSet::new(new.iter().map(TextRecord::text).collect());
    let mut changes = Vec::new();

    for record in old {
        match new_set.best_match(record.text(), threshold, metric) {
            Some((_, 100)) => {}
            Some((j, similarity)) => changes.push(RecordChange::Modified {
                old: record.clone(),
                new: new[j].clone(),
                similarity,
            }),
            None => changes.push(RecordChange::Removed {
                record: record.clone(),
            }),
        }
    }

    for record in new {
        if old_set.best_match(record.text(), threshold, metric).is_none() {
            changes.push(RecordChange::Added {
                record: record.clone(),
            });
        }
    }

    changes
}

/// Positional table-shape comparison: index `i` on one side is compared with
/// index `i` on the other, and surplus trailing tables are added or removed.
pub fn diff_table_shapes(old: &[Table], new: &[Table]) -> TableChanges {
    let shared = old.len().min(new.len());
    let tables_modified = old
        .iter()
        .zip(new.iter())
        .enumerate()
        .filter_map(|(i, (o, n))| {
            let old_dimensions = Dimensions {
                rows: o.row_count,
                cols: o.col_count,
            };
            let new_dimensions = Dimensions {
                rows: n.row_count,
                cols: n.col_count,
            };
            (old_dimensions != new_dimensions).then_some(TableShapeChange {
                table_index: i,
                old_dimensions,
                new_dimensions,
            })
        })
        .collect();

    TableChanges {
        tables_added: (shared..new.len()).collect(),
        tables_removed: (shared..old.len()).collect(),
        tables_modified,
    }
}
