use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::PricingConfig;
use crate::model::{PricingVeto, TableType};
use crate::patterns::{extract_item_id, looks_monetary};

/// Header words that mark a price or price-region column.
static PRICE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:national|(?:very )?remote|prices?|rates?|costs?|limits?|amounts?)\b")
        .unwrap()
});

static UNIT_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bunits?\b").unwrap());

static PRICING_CONTEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:pricing|prices?|rates?|costs?)\b").unwrap());

const ITEM_HEADER_PHRASES: &[&str] = &["item number", "support item", "item name"];
const REFERENCE_HEADER_WORDS: &[&str] = &["mmm", "postcode", "location", "state", "zone"];
const METADATA_HEADER_WORDS: &[&str] = &["version", "date published", "amendment", "page(s)"];

/// Rows sampled from the start of the table must carry item ids in column 0
/// at least this many times to count.
const MIN_ITEM_ID_ROWS: usize = 3;
const MIN_MONETARY_CELLS: usize = 5;

pub fn is_price_header(header: &str) -> bool {
    PRICE_HEADER.is_match(header)
}

pub fn count_price_headers(headers: &[String]) -> usize {
    headers.iter().filter(|h| is_price_header(h)).count()
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Per-signal breakdown of the pricing-table score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PricingScore {
    pub size: i32,
    pub price_headers: i32,
    pub item_ids: i32,
    pub item_header: i32,
    pub unit_header: i32,
    /// Nearby paragraphs talk about pricing.
    pub context: i32,
    pub monetary: i32,
    pub narrative_penalty: i32,
    pub has_price_evidence: bool,
    pub has_narrative_cell: bool,
}

impl PricingScore {
    pub fn raw(&self) -> i32 {
        self.size
            + self.price_headers
            + self.item_ids
            + self.item_header
            + self.unit_header
            + self.context
            + self.monetary
            + self.narrative_penalty
    }

    pub fn confidence(&self) -> u8 {
        self.raw().clamp(0, 100) as u8
    }

    /// A gate that rejects the table as pricing regardless of its score.
    pub fn veto(&self) -> Option<PricingVeto> {
        if self.has_narrative_cell {
            Some(PricingVeto::NarrativeCell)
        } else if !self.has_price_evidence {
            Some(PricingVeto::NoPriceEvidence)
        } else {
            None
        }
    }

    /// The veto that overrode a passing score, if any. `None` both when the
    /// table is pricing and when it simply scored below `threshold`.
    pub fn overriding_veto(&self, threshold: u8) -> Option<PricingVeto> {
        if self.confidence() >= threshold {
            self.veto()
        } else {
            None
        }
    }

    /// Confident enough, backed by an actual price signal, and not narrative.
    pub fn is_pricing(&self, threshold: u8) -> bool {
        self.confidence() >= threshold && self.veto().is_none()
    }
}

/// Score a normalized table for being a priced-item table.
///
/// `data` holds the rows below the header block. `context` is the text of the
/// paragraphs just before the table. An empty table scores zero on every
/// signal.
pub fn score_pricing_table(
    headers: &[String],
    data: &[Vec<String>],
    context: &[&str],
    config: &PricingConfig,
) -> PricingScore {
    if data.is_empty() {
        return PricingScore::default();
    }
    let mut score = PricingScore::default();

    score.size = match data.len() {
        n if n >= 50 => 40,
        n if n >= 20 => 30,
        n if n >= 10 => 20,
        _ => 0,
    };

    let price_headers = count_price_headers(headers);
    score.price_headers = match price_headers {
        n if n >= 3 => 40,
        2 => 30,
        1 => 20,
        _ => 0,
    };

    let sample = &data[..data.len().min(config.sample_rows)];
    let id_rows = sample
        .iter()
        .filter(|row| row.first().is_some_and(|c| extract_item_id(c).is_some()))
        .count();
    if id_rows >= MIN_ITEM_ID_ROWS {
        score.item_ids = 30;
    }

    let header_text = headers.join(" ").to_lowercase();
    if ITEM_HEADER_PHRASES.iter().any(|p| header_text.contains(p)) {
        score.item_header = 10;
    }
    if UNIT_HEADER.is_match(&header_text) {
        score.unit_header = 10;
    }
    if context.iter().any(|t| PRICING_CONTEXT.is_match(t)) {
        score.context = 10;
    }

    let monetary_cells = sample
        .iter()
        .flat_map(|row| row.iter())
        .filter(|c| looks_monetary(c))
        .count();
    if monetary_cells >= MIN_MONETARY_CELLS {
        score.monetary = 10;
    }

    score.has_narrative_cell = sample
        .iter()
        .flat_map(|row| row.iter())
        .any(|c| c.chars().count() > config.narrative_cell_chars);
    if score.has_narrative_cell {
        score.narrative_penalty = -30;
    }

    score.has_price_evidence = price_headers > 0 || monetary_cells > 0;
    score
}

/// Coarse table category for reporting. Pricing wins outright; the rest are
/// keyword checks on the collapsed headers.
pub fn classify_table_type(
    is_pricing: bool,
    headers: &[String],
    data: &[Vec<String>],
    config: &PricingConfig,
) -> TableType {
    if is_pricing {
        return TableType::Pricing;
    }
    if data.len() <= 5
        && data
            .iter()
            .flat_map(|row| row.iter())
            .any(|c| c.chars().count() > config.narrative_cell_chars)
    {
        return TableType::Example;
    }
    let header_text = headers.join(" ").to_lowercase();
    if REFERENCE_HEADER_WORDS.iter().any(|w| header_text.contains(w)) {
        return TableType::Reference;
    }
    if METADATA_HEADER_WORDS.iter().any(|w| header_text.contains(w)) {
        return TableType::Metadata;
    }
    TableType::Other
}
