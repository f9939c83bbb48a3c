//! `docdelta inspect`: per-table classification of a single document.

use std::path::PathBuf;

use serde::Serialize;

use docdelta_core::anomaly;
use docdelta_core::config::AnomalyConfig;
use docdelta_core::model::{DocumentMetadata, PricingVeto, TableType};
use docdelta_core::{ParsedDocument, Table};

use crate::util::{load_config, load_document, pad_right, to_json, truncate_display};
use crate::CliError;

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub file: String,
    pub metadata: DocumentMetadata,
    pub tables: Vec<TableReport>,
    pub sections: Vec<SectionReport>,
}

#[derive(Debug, Serialize)]
pub struct TableReport {
    pub index: usize,
    pub page: u32,
    pub rows: usize,
    pub cols: usize,
    pub header_rows: usize,
    pub table_type: TableType,
    pub confidence: u8,
    pub is_pricing_table: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_veto: Option<PricingVeto>,
    pub is_anomalous: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anomaly_reasons: Vec<String>,
    pub headers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SectionReport {
    pub heading: String,
    pub level: u8,
    pub rules: usize,
    pub guidance: usize,
}

impl TableReport {
    fn new(table: &Table, anomaly_config: &AnomalyConfig) -> Self {
        Self {
            index: table.index,
            page: table.page,
            rows: table.row_count,
            cols: table.col_count,
            header_rows: table.header_rows,
            table_type: table.table_type,
            confidence: table.pricing_confidence,
            is_pricing_table: table.is_pricing_table,
            pricing_veto: table.pricing_veto,
            is_anomalous: table.is_anomalous,
            anomaly_reasons: anomaly::detect(&table.headers, table.col_count, anomaly_config)
                .iter()
                .map(ToString::to_string)
                .collect(),
            headers: table.headers.clone(),
        }
    }
}

pub fn build_report(file: String, doc: &ParsedDocument, anomaly_config: &AnomalyConfig) -> InspectReport {
    let headings: Vec<usize> = doc.headings().map(|h| h.index).collect();
    let mut sections: Vec<SectionReport> = doc
        .headings()
        .map(|h| SectionReport {
            heading: h.text.clone(),
            level: h.heading_level,
            rules: 0,
            guidance: 0,
        })
        .collect();

    // Attribute each record to the closest heading above it.
    let section_of = |paragraph_index: usize| headings.iter().rposition(|&i| i < paragraph_index);
    for rule in &doc.rules {
        if let Some(slot) = section_of(rule.paragraph_index) {
            sections[slot].rules += 1;
        }
    }
    for guidance in &doc.guidance {
        if let Some(slot) = section_of(guidance.paragraph_index) {
            sections[slot].guidance += 1;
        }
    }

    InspectReport {
        file,
        metadata: doc.metadata.clone(),
        tables: doc
            .tables
            .iter()
            .map(|t| TableReport::new(t, anomaly_config))
            .collect(),
        sections,
    }
}

const HEADER_PREVIEW_COLS: usize = 60;

pub fn render_report(report: &InspectReport) -> String {
    let m = &report.metadata;
    let mut lines = vec![format!(
        "{}: {} paragraphs, {} headings, {} tables ({} pricing, {} anomalous), {} rules, {} guidance",
        report.file,
        m.total_paragraphs,
        m.total_headings,
        m.total_tables,
        m.pricing_tables,
        m.anomalous_tables,
        m.total_rules,
        m.total_guidance,
    )];

    if !report.tables.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  {}{}{}{}{}headers",
            pad_right("#", 5),
            pad_right("page", 6),
            pad_right("size", 9),
            pad_right("type", 11),
            pad_right("conf", 6),
        ));
    }
    for t in &report.tables {
        let kind = if t.is_anomalous && t.is_pricing_table {
            format!("{}*", t.table_type)
        } else {
            t.table_type.to_string()
        };
        lines.push(format!(
            "  {}{}{}{}{}{}",
            pad_right(&t.index.to_string(), 5),
            pad_right(&t.page.to_string(), 6),
            pad_right(&format!("{}x{}", t.rows, t.cols), 9),
            pad_right(&kind, 11),
            pad_right(&t.confidence.to_string(), 6),
            truncate_display(&t.headers.join(" | "), HEADER_PREVIEW_COLS),
        ));
        if let Some(veto) = t.pricing_veto {
            lines.push(format!("       not pricing despite score: {veto}"));
        }
        if t.is_pricing_table && !t.anomaly_reasons.is_empty() {
            lines.push(format!(
                "       * not compared: {}",
                t.anomaly_reasons.join(", ")
            ));
        }
    }

    if !report.sections.is_empty() {
        lines.push(String::new());
        for s in &report.sections {
            let indent = "  ".repeat(usize::from(s.level.max(1)));
            lines.push(format!(
                "{indent}{} ({} rules, {} guidance)",
                truncate_display(&s.heading, HEADER_PREVIEW_COLS),
                s.rules,
                s.guidance
            ));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn cmd_inspect(file: PathBuf, config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let doc = load_document(&file, &config)?;
    let report = build_report(file.display().to_string(), &doc, &config.anomaly);

    if json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}
