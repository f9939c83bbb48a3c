use serde::Serialize;

use crate::model::{GuidanceRecord, Paragraph, PriceChange, RuleRecord};

// ---------------------------------------------------------------------------
// Record changes
// ---------------------------------------------------------------------------

/// Outcome of matching one free-text record across versions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordChange<T> {
    Added { record: T },
    Removed { record: T },
    Modified { old: T, new: T, similarity: u8 },
}

impl<T> RecordChange<T> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Modified { .. } => ChangeKind::Modified,
        }
    }

    /// The record on the newest side that carries this change.
    pub fn latest(&self) -> &T {
        match self {
            Self::Added { record } | Self::Removed { record } => record,
            Self::Modified { new, .. } => new,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// Tallies of one change list by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl ChangeCounts {
    pub fn of<T>(changes: &[RecordChange<T>]) -> Self {
        let mut counts = Self::default();
        for c in changes {
            match c.kind() {
                ChangeKind::Added => counts.added += 1,
                ChangeKind::Removed => counts.removed += 1,
                ChangeKind::Modified => counts.modified += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

// ---------------------------------------------------------------------------
// Table shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableShapeChange {
    pub table_index: usize,
    pub old_dimensions: Dimensions,
    pub new_dimensions: Dimensions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableChanges {
    /// Trailing new-side indices with no positional counterpart.
    pub tables_added: Vec<usize>,
    /// Trailing old-side indices with no positional counterpart.
    pub tables_removed: Vec<usize>,
    pub tables_modified: Vec<TableShapeChange>,
}

impl TableChanges {
    pub fn total(&self) -> usize {
        self.tables_added.len() + self.tables_removed.len() + self.tables_modified.len()
    }
}

/// Pricing tables kept out of price matching because their layout is anomalous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuppressedTables {
    pub old: Vec<usize>,
    pub new: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Aggregate view of the price changes. All amounts are in cents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSummary {
    pub total_changes: usize,
    pub increases: usize,
    pub decreases: usize,
    pub average_change_cents: f64,
    pub largest_increase_cents: i64,
    pub largest_decrease_cents: i64,
    pub total_increase_cents: i64,
    pub total_decrease_cents: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub total_price_changes: usize,
    pub price_increases: usize,
    pub price_decreases: usize,
    pub total_rule_changes: usize,
    pub rules_added: usize,
    pub rules_removed: usize,
    pub rules_modified: usize,
    pub mandatory_rule_changes: usize,
    pub total_guidance_changes: usize,
    pub guidance_added: usize,
    pub guidance_removed: usize,
    pub guidance_modified: usize,
    /// New word count minus old word count across all guidance records.
    pub guidance_word_change: i64,
    pub sections_added: usize,
    pub sections_removed: usize,
    pub sections_modified: usize,
    pub tables_added: usize,
    pub tables_removed: usize,
    pub tables_modified: usize,
}

impl ComparisonSummary {
    pub fn has_changes(&self) -> bool {
        self.total_price_changes
            + self.total_rule_changes
            + self.total_guidance_changes
            + self.sections_added
            + self.sections_removed
            + self.sections_modified
            + self.tables_added
            + self.tables_removed
            + self.tables_modified
            > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub paragraphs: usize,
    pub tables: usize,
    pub pricing_tables: usize,
    pub rules: usize,
    pub guidance: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonMeta {
    pub engine_version: String,
    pub old_document: DocumentStats,
    pub new_document: DocumentStats,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Everything one `compare` call produces. Read-only for consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub meta: ComparisonMeta,
    pub summary: ComparisonSummary,
    pub price_changes: Vec<PriceChange>,
    pub price_summary: PriceSummary,
    pub rule_changes: Vec<RecordChange<RuleRecord>>,
    pub guidance_changes: Vec<RecordChange<GuidanceRecord>>,
    /// Heading-level changes.
    pub structural_changes: Vec<RecordChange<Paragraph>>,
    pub table_changes: TableChanges,
    pub suppressed_tables: SuppressedTables,
}
