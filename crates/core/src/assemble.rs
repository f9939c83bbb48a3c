use std::collections::BTreeSet;

use crate::config::EngineConfig;
use crate::extract::extract_prices;
use crate::model::{
    GuidanceRecord, Paragraph, ParsedDocument, PriceChange, PriceRecord, RuleRecord, RuleTier,
};
use crate::result::{
    ChangeCounts, ComparisonMeta, ComparisonResult, ComparisonSummary, DocumentStats,
    PriceSummary, RecordChange, SuppressedTables,
};
use crate::semantic::{diff_records, diff_table_shapes};
use crate::signature::match_prices;
use crate::similarity::{LevenshteinRatio, TextSimilarity};

/// Compare two parsed documents with the default configuration.
pub fn compare(old: &ParsedDocument, new: &ParsedDocument) -> ComparisonResult {
    compare_with(old, new, &EngineConfig::default())
}

pub fn compare_with(
    old: &ParsedDocument,
    new: &ParsedDocument,
    config: &EngineConfig,
) -> ComparisonResult {
    compare_using(old, new, config, &LevenshteinRatio)
}

/// Full comparison with a caller-supplied text metric.
///
/// Pure: the result depends only on the two documents, the config and the
/// metric.
pub fn compare_using(
    old: &ParsedDocument,
    new: &ParsedDocument,
    config: &EngineConfig,
    metric: &dyn TextSimilarity,
) -> ComparisonResult {
    let excluded = anomalous_indices(old, new);
    let (old_prices, old_suppressed) = comparable_prices(old, &excluded);
    let (new_prices, new_suppressed) = comparable_prices(new, &excluded);
    let price_changes = match_prices(&old_prices, &new_prices);
    let price_summary = summarize_prices(&price_changes);

    let thresholds = &config.similarity;
    let rule_changes = diff_records(&old.rules, &new.rules, thresholds.rule_threshold, metric);
    let guidance_changes = diff_records(
        &old.guidance,
        &new.guidance,
        thresholds.diff_threshold,
        metric,
    );
    let old_headings: Vec<Paragraph> = old.headings().cloned().collect();
    let new_headings: Vec<Paragraph> = new.headings().cloned().collect();
    let structural_changes =
        diff_records(&old_headings, &new_headings, thresholds.diff_threshold, metric);
    let table_changes = diff_table_shapes(&old.tables, &new.tables);

    let rules = ChangeCounts::of(&rule_changes);
    let guidance = ChangeCounts::of(&guidance_changes);
    let sections = ChangeCounts::of(&structural_changes);
    let summary = ComparisonSummary {
        total_price_changes: price_summary.total_changes,
        price_increases: price_summary.increases,
        price_decreases: price_summary.decreases,
        total_rule_changes: rules.total(),
        rules_added: rules.added,
        rules_removed: rules.removed,
        rules_modified: rules.modified,
        mandatory_rule_changes: rule_changes.iter().filter(|c| touches_mandatory(c)).count(),
        total_guidance_changes: guidance.total(),
        guidance_added: guidance.added,
        guidance_removed: guidance.removed,
        guidance_modified: guidance.modified,
        guidance_word_change: word_count(&new.guidance) as i64 - word_count(&old.guidance) as i64,
        sections_added: sections.added,
        sections_removed: sections.removed,
        sections_modified: sections.modified,
        tables_added: table_changes.tables_added.len(),
        tables_removed: table_changes.tables_removed.len(),
        tables_modified: table_changes.tables_modified.len(),
    };

    tracing::info!(
        prices = summary.total_price_changes,
        rules = summary.total_rule_changes,
        guidance = summary.total_guidance_changes,
        sections = sections.total(),
        tables = table_changes.total(),
        "comparison complete"
    );

    ComparisonResult {
        meta: ComparisonMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            old_document: stats(old),
            new_document: stats(new),
        },
        summary,
        price_changes,
        price_summary,
        rule_changes,
        guidance_changes,
        structural_changes,
        table_changes,
        suppressed_tables: SuppressedTables {
            old: old_suppressed,
            new: new_suppressed,
        },
    }
}

/// Table indices that are anomalous in either document. A table index in this
/// set contributes no prices from either side.
fn anomalous_indices(old: &ParsedDocument, new: &ParsedDocument) -> BTreeSet<usize> {
    old.tables
        .iter()
        .chain(new.tables.iter())
        .filter(|t| t.is_anomalous)
        .map(|t| t.index)
        .collect()
}

/// Prices from pricing tables that are safe to compare, plus the indices of
/// this document's pricing tables held back as anomalous.
fn comparable_prices(
    doc: &ParsedDocument,
    excluded: &BTreeSet<usize>,
) -> (Vec<PriceRecord>, Vec<usize>) {
    let mut prices = Vec::new();
    let mut suppressed = Vec::new();
    for table in doc.tables.iter().filter(|t| t.is_pricing_table) {
        if table.is_anomalous {
            tracing::info!(table = table.index, "skipping anomalous pricing table");
            suppressed.push(table.index);
            continue;
        }
        if excluded.contains(&table.index) {
            tracing::info!(
                table = table.index,
                "skipping pricing table whose index is anomalous in the other version"
            );
            continue;
        }
        prices.extend(extract_prices(table));
    }
    (prices, suppressed)
}

fn touches_mandatory(change: &RecordChange<RuleRecord>) -> bool {
    match change {
        RecordChange::Added { record } | RecordChange::Removed { record } => {
            record.tier == RuleTier::Mandatory
        }
        RecordChange::Modified { old, new, .. } => {
            old.tier == RuleTier::Mandatory || new.tier == RuleTier::Mandatory
        }
    }
}

fn word_count(guidance: &[GuidanceRecord]) -> usize {
    guidance.iter().map(|g| g.text.split_whitespace().count()).sum()
}

fn stats(doc: &ParsedDocument) -> DocumentStats {
    DocumentStats {
        paragraphs: doc.metadata.total_paragraphs,
        tables: doc.metadata.total_tables,
        pricing_tables: doc.metadata.pricing_tables,
        rules: doc.rules.len(),
        guidance: doc.guidance.len(),
    }
}

pub fn summarize_prices(changes: &[PriceChange]) -> PriceSummary {
    if changes.is_empty() {
        return PriceSummary::default();
    }
    let increases: Vec<i64> = changes
        .iter()
        .map(|c| c.difference_cents)
        .filter(|d| *d > 0)
        .collect();
    let decreases: Vec<i64> = changes
        .iter()
        .map(|c| c.difference_cents)
        .filter(|d| *d < 0)
        .collect();
    let total: i64 = changes.iter().map(|c| c.difference_cents).sum();

    PriceSummary {
        total_changes: changes.len(),
        increases: increases.len(),
        decreases: decreases.len(),
        average_change_cents: total as f64 / changes.len() as f64,
        largest_increase_cents: increases.iter().copied().max().unwrap_or(0),
        largest_decrease_cents: decreases.iter().copied().min().unwrap_or(0),
        total_increase_cents: increases.iter().sum(),
        total_decrease_cents: decreases.iter().sum(),
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

const DESCRIPTION_PREVIEW_CHARS: usize = 50;

/// `1234567` cents as `12345.67`, sign dropped.
pub fn format_cents(cents: i64) -> String {
    let abs = cents.unsigned_abs();
    format!("{}.{:02}", abs / 100, abs % 100)
}

/// One-line rendering, e.g.
/// `Item 01_001 (Assistance): $50.00 → $55.00 (+$5.00, +10.0%)`.
pub fn format_price_change(change: &PriceChange) -> String {
    let mut out = format!("Item {}", change.item_id);
    if let Some(desc) = change.item_description.as_deref().filter(|d| !d.is_empty()) {
        if desc.chars().count() > DESCRIPTION_PREVIEW_CHARS {
            let preview: String = desc.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            out.push_str(&format!(" ({preview}...)"));
        } else {
            out.push_str(&format!(" ({desc})"));
        }
    }

    let diff_sign = if change.difference_cents > 0 { "+" } else { "-" };
    let pct = if change.percent_change > 0.0 {
        format!("+{:.1}%", change.percent_change)
    } else {
        format!("{:.1}%", change.percent_change)
    };
    out.push_str(&format!(
        ": ${} → ${} ({diff_sign}${}, {pct})",
        format_cents(change.old_price_cents),
        format_cents(change.new_price_cents),
        format_cents(change.difference_cents),
    ));
    out
}
