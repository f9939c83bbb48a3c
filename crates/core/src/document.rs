use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::anomaly;
use crate::classify::{classify_table_type, score_pricing_table};
use crate::config::EngineConfig;
use crate::content::{extract_guidance, extract_rules};
use crate::model::{
    Block, DocumentMetadata, Paragraph, ParsedDocument, RawDocument, RawParagraph, RawTable, Table,
};
use crate::normalize::normalize;

static HEADING_LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)heading\s*(\d+)").unwrap());

/// Paragraphs before a table that are read as its context.
const CONTEXT_PARAGRAPHS: usize = 3;

/// Classify a paragraph by its style name. A heading style without a number
/// is treated as level 1.
pub fn build_paragraph(raw: RawParagraph) -> Paragraph {
    let is_heading = raw.style_name.to_lowercase().contains("heading");
    let heading_level = if is_heading {
        HEADING_LEVEL
            .captures(&raw.style_name)
            .and_then(|c| c[1].parse::<u8>().ok())
            .unwrap_or(1)
            .max(1)
    } else {
        0
    };
    Paragraph {
        index: raw.index,
        text: raw.text,
        style_name: raw.style_name,
        is_heading,
        heading_level,
    }
}

/// Normalize, score and flag one table.
pub fn build_table(index: usize, raw: RawTable, context: &[&str], config: &EngineConfig) -> Table {
    let normalized = normalize(&raw.rows, config.pricing.max_header_rows);
    let data = &normalized.grid[normalized.header_rows..];

    let score = score_pricing_table(&normalized.headers, data, context, &config.pricing);
    let threshold = config.pricing.confidence_threshold;
    let is_pricing_table = score.is_pricing(threshold);
    let pricing_veto = score.overriding_veto(threshold);
    let table_type = classify_table_type(is_pricing_table, &normalized.headers, data, &config.pricing);
    let reasons = anomaly::detect(&normalized.headers, normalized.col_count, &config.anomaly);

    tracing::debug!(
        table = index,
        page = raw.page,
        rows = normalized.grid.len(),
        cols = normalized.col_count,
        header_rows = normalized.header_rows,
        confidence = score.confidence(),
        %table_type,
        "classified table"
    );
    if let Some(veto) = pricing_veto {
        tracing::debug!(table = index, %veto, "pricing score overridden");
    }
    if is_pricing_table && !reasons.is_empty() {
        let why: Vec<String> = reasons.iter().map(ToString::to_string).collect();
        tracing::info!(table = index, reasons = %why.join(", "), "anomalous pricing table");
    }

    Table {
        index,
        page: raw.page,
        row_count: normalized.grid.len(),
        col_count: normalized.col_count,
        header_rows: normalized.header_rows,
        headers: normalized.headers,
        grid: normalized.grid,
        is_pricing_table,
        pricing_confidence: score.confidence(),
        pricing_veto,
        table_type,
        is_anomalous: !reasons.is_empty(),
    }
}

/// Turn loader output into an immutable parsed document.
pub fn build_document(raw: RawDocument, config: &EngineConfig) -> ParsedDocument {
    let RawDocument {
        paragraphs,
        tables,
        blocks,
    } = raw;

    let paragraphs: Vec<Paragraph> = paragraphs.into_iter().map(build_paragraph).collect();

    let tables: Vec<Table> = {
        // Context for each table is the few paragraphs just before it.
        let mut contexts: Vec<Vec<&str>> = vec![Vec::new(); tables.len()];
        let mut recent: VecDeque<&str> = VecDeque::with_capacity(CONTEXT_PARAGRAPHS);
        for block in &blocks {
            match *block {
                Block::Paragraph(i) => {
                    if let Some(p) = paragraphs.get(i) {
                        if recent.len() == CONTEXT_PARAGRAPHS {
                            recent.pop_front();
                        }
                        recent.push_back(&p.text);
                    }
                }
                Block::Table(t) => {
                    if let Some(slot) = contexts.get_mut(t) {
                        *slot = recent.iter().copied().collect();
                    }
                }
            }
        }

        tables
            .into_iter()
            .zip(contexts.iter())
            .enumerate()
            .map(|(i, (raw, context))| build_table(i, raw, context, config))
            .collect()
    };

    let rules = extract_rules(&paragraphs);
    let guidance = extract_guidance(&paragraphs);

    let metadata = DocumentMetadata {
        parsed_at: chrono::Utc::now().to_rfc3339(),
        total_paragraphs: paragraphs.len(),
        total_tables: tables.len(),
        total_headings: paragraphs.iter().filter(|p| p.is_heading).count(),
        document_length: paragraphs.iter().map(|p| p.text.chars().count()).sum(),
        pricing_tables: tables.iter().filter(|t| t.is_pricing_table).count(),
        anomalous_tables: tables.iter().filter(|t| t.is_anomalous).count(),
        total_rules: rules.len(),
        total_guidance: guidance.len(),
    };

    tracing::info!(
        paragraphs = metadata.total_paragraphs,
        tables = metadata.total_tables,
        pricing_tables = metadata.pricing_tables,
        anomalous_tables = metadata.anomalous_tables,
        rules = metadata.total_rules,
        guidance = metadata.total_guidance,
        "parsed document"
    );

    ParsedDocument {
        paragraphs,
        tables,
        blocks,
        rules,
        guidance,
        metadata,
    }
}
