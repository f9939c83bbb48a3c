//! Human-readable rendering of a comparison result.

use docdelta_core::assemble::format_cents;
use docdelta_core::format_price_change;
use docdelta_core::result::{ChangeCounts, RecordChange};
use docdelta_core::ComparisonResult;

use crate::util::truncate_display;

const TEXT_PREVIEW_COLS: usize = 80;

fn signed_cents(cents: i64) -> String {
    match cents {
        c if c > 0 => format!("+${}", format_cents(c)),
        c if c < 0 => format!("-${}", format_cents(c)),
        _ => "$0.00".to_string(),
    }
}

fn signed(n: i64) -> String {
    if n > 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

fn counts_line(label: &str, counts: ChangeCounts) -> String {
    format!(
        "{:<10}{} changed ({} added, {} removed, {} modified)",
        format!("{label}:"),
        counts.total(),
        counts.added,
        counts.removed,
        counts.modified
    )
}

fn change_marker<T>(change: &RecordChange<T>) -> String {
    match change {
        RecordChange::Modified { similarity, .. } => format!("modified {similarity:>3}%"),
        other => format!("{:<13}", other.kind().to_string()),
    }
}

/// Summary for the terminal. `limit` caps each itemized list.
pub fn render_comparison(result: &ComparisonResult, limit: usize) -> String {
    let s = &result.summary;
    if !s.has_changes() && result.suppressed_tables.old.is_empty() && result.suppressed_tables.new.is_empty() {
        return "No differences.\n".to_string();
    }

    let mut lines: Vec<String> = Vec::new();

    // Prices
    let p = &result.price_summary;
    lines.push(format!(
        "{:<10}{} changed ({} up, {} down), net {}",
        "Prices:",
        p.total_changes,
        p.increases,
        p.decreases,
        signed_cents(p.total_increase_cents + p.total_decrease_cents),
    ));
    for change in result.price_changes.iter().take(limit) {
        lines.push(format!("  {}", format_price_change(change)));
    }
    if result.price_changes.len() > limit {
        lines.push(format!(
            "  ... {} more (use --json for the full list)",
            result.price_changes.len() - limit
        ));
    }

    // Rules
    let rules = ChangeCounts::of(&result.rule_changes);
    let mut line = counts_line("Rules", rules);
    if s.mandatory_rule_changes > 0 {
        line.push_str(&format!(", {} mandatory", s.mandatory_rule_changes));
    }
    lines.push(line);
    for change in result.rule_changes.iter().take(limit) {
        let rule = change.latest();
        lines.push(format!(
            "  {} {}/{}  {}",
            change_marker(change),
            rule.tier,
            rule.category,
            truncate_display(&rule.text, TEXT_PREVIEW_COLS)
        ));
    }

    // Guidance
    let mut line = counts_line("Guidance", ChangeCounts::of(&result.guidance_changes));
    line.push_str(&format!(", word count {}", signed(s.guidance_word_change)));
    lines.push(line);

    // Sections
    lines.push(counts_line("Sections", ChangeCounts::of(&result.structural_changes)));
    for change in result.structural_changes.iter().take(limit) {
        let heading = change.latest();
        lines.push(format!(
            "  {} {}",
            change_marker(change),
            truncate_display(&heading.text, TEXT_PREVIEW_COLS)
        ));
    }

    // Tables
    let t = &result.table_changes;
    lines.push(format!(
        "{:<10}{} changed ({} added, {} removed, {} modified)",
        "Tables:",
        t.total(),
        t.tables_added.len(),
        t.tables_removed.len(),
        t.tables_modified.len()
    ));
    for shape in t.tables_modified.iter().take(limit) {
        lines.push(format!(
            "  table {}: {} -> {}",
            shape.table_index, shape.old_dimensions, shape.new_dimensions
        ));
    }

    let suppressed = &result.suppressed_tables;
    if !suppressed.old.is_empty() || !suppressed.new.is_empty() {
        lines.push(format!(
            "Suppressed pricing tables (anomalous layout): old {:?}, new {:?}",
            suppressed.old, suppressed.new
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
