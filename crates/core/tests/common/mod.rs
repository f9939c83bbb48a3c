#![allow(dead_code)]

use docdelta_core::model::{Block, RawDocument, RawParagraph, RawTable};
use docdelta_core::{build_document, EngineConfig, ParsedDocument};

pub const PRICE_HEADERS: [&str; 6] = [
    "Item Number",
    "Item Name",
    "National",
    "Remote",
    "Very Remote",
    "Unit",
];

/// Builds a `RawDocument` in document order.
#[derive(Default)]
pub struct DocBuilder {
    raw: RawDocument,
    next_paragraph: usize,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn paragraph(mut self, text: &str, style: &str) -> Self {
        self.raw.blocks.push(Block::Paragraph(self.raw.paragraphs.len()));
        self.raw.paragraphs.push(RawParagraph {
            index: self.next_paragraph,
            text: text.to_string(),
            style_name: style.to_string(),
        });
        self.next_paragraph += 1;
        self
    }

    pub fn heading(self, text: &str, level: u8) -> Self {
        self.paragraph(text, &format!("Heading {level}"))
    }

    pub fn body(self, text: &str) -> Self {
        self.paragraph(text, "Normal")
    }

    pub fn table(mut self, rows: Vec<Vec<String>>) -> Self {
        self.raw.blocks.push(Block::Table(self.raw.tables.len()));
        self.raw.tables.push(RawTable { rows, page: 1 });
        self
    }

    pub fn raw(self) -> RawDocument {
        self.raw
    }

    pub fn build(self) -> ParsedDocument {
        build_document(self.raw, &EngineConfig::default())
    }
}

pub fn item_id(i: usize) -> String {
    format!("01_{:03}_0107_1_1", i)
}

pub fn money(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

pub fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

/// A pricing table: standard header plus one row per `(id, [national, remote, very remote])`.
pub fn pricing_table(items: &[(String, [i64; 3])]) -> Vec<Vec<String>> {
    let mut rows = vec![strings(&PRICE_HEADERS)];
    for (id, prices) in items {
        rows.push(vec![
            id.clone(),
            "Assistance with daily life".to_string(),
            money(prices[0]),
            money(prices[1]),
            money(prices[2]),
            "Hour".to_string(),
        ]);
    }
    rows
}

/// `n` items with distinct ids and simple prices.
pub fn items(n: usize, base: i64) -> Vec<(String, [i64; 3])> {
    (0..n)
        .map(|i| {
            let p = base + i as i64 * 100;
            (item_id(i), [p, p + p * 2 / 5, p + p / 2])
        })
        .collect()
}

/// A small table that is never a pricing table.
pub fn filler_table(tag: &str) -> Vec<Vec<String>> {
    vec![
        strings(&["Name", "Role"]),
        vec![format!("{tag} one"), "Lead".into()],
        vec![format!("{tag} two"), "Member".into()],
    ]
}
