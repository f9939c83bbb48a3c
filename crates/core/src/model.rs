use serde::Serialize;

// ---------------------------------------------------------------------------
// Loader input
// ---------------------------------------------------------------------------

/// A body paragraph as read from the container, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParagraph {
    /// Position among all body paragraphs, empty ones included.
    pub index: usize,
    pub text: String,
    pub style_name: String,
}

/// A body table as read from the container: possibly ragged rows of cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
    /// 1-based page the table starts on.
    pub page: u32,
}

/// Position of a record in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Block {
    /// Offset into `paragraphs`.
    Paragraph(usize),
    /// Offset into `tables`.
    Table(usize),
}

/// Everything the loader yields for one document, in document order.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub paragraphs: Vec<RawParagraph>,
    pub tables: Vec<RawTable>,
    pub blocks: Vec<Block>,
}

// ---------------------------------------------------------------------------
// Parsed document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub index: usize,
    pub text: String,
    pub style_name: String,
    pub is_heading: bool,
    /// 0 for body text, 1+ for section headers.
    pub heading_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    Pricing,
    Example,
    Reference,
    Metadata,
    Other,
}

impl std::fmt::Display for TableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pricing => write!(f, "pricing"),
            Self::Example => write!(f, "example"),
            Self::Reference => write!(f, "reference"),
            Self::Metadata => write!(f, "metadata"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Why a table that reached the confidence threshold is still not pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingVeto {
    /// No price-like header and no money amount in the sampled rows.
    NoPriceEvidence,
    /// A sampled cell is long enough to be narrative text.
    NarrativeCell,
}

impl std::fmt::Display for PricingVeto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPriceEvidence => write!(f, "no price headers or amounts"),
            Self::NarrativeCell => write!(f, "narrative cell"),
        }
    }
}

/// A normalized table.
///
/// `is_pricing_table` is true exactly when `pricing_confidence` reaches the
/// configured threshold and `pricing_veto` is `None`.
///
/// Every row of `grid` has exactly `col_count` cells and `headers` has exactly
/// `col_count` entries. The first `header_rows` rows of `grid` are the header
/// block that `headers` was collapsed from; the rest are data rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub index: usize,
    pub page: u32,
    pub row_count: usize,
    pub col_count: usize,
    pub header_rows: usize,
    pub grid: Vec<Vec<String>>,
    pub headers: Vec<String>,
    pub is_pricing_table: bool,
    pub pricing_confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_veto: Option<PricingVeto>,
    pub table_type: TableType,
    pub is_anomalous: bool,
}

impl Table {
    /// Rows below the header block, paired with their absolute grid index.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        self.grid.iter().enumerate().skip(self.header_rows)
    }

    pub fn data_row_count(&self) -> usize {
        self.row_count.saturating_sub(self.header_rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Claiming,
    Quoting,
    Evidence,
    Approval,
    Condition,
    Threshold,
    Requirement,
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Claiming => write!(f, "claiming"),
            Self::Quoting => write!(f, "quoting"),
            Self::Evidence => write!(f, "evidence"),
            Self::Approval => write!(f, "approval"),
            Self::Condition => write!(f, "condition"),
            Self::Threshold => write!(f, "threshold"),
            Self::Requirement => write!(f, "requirement"),
        }
    }
}

/// Strength of the language a rule is phrased in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTier {
    Mandatory,
    Recommended,
    Optional,
    Informational,
}

impl std::fmt::Display for RuleTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mandatory => write!(f, "mandatory"),
            Self::Recommended => write!(f, "recommended"),
            Self::Optional => write!(f, "optional"),
            Self::Informational => write!(f, "informational"),
        }
    }
}

/// Figures quoted inside a rule's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleEntities {
    pub amounts: Vec<String>,
    pub percentages: Vec<String>,
    pub periods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRecord {
    pub category: RuleCategory,
    pub tier: RuleTier,
    pub text: String,
    pub paragraph_index: usize,
    pub entities: RuleEntities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidanceRecord {
    /// Title of the heading the paragraph sits under.
    pub section: String,
    pub section_level: u8,
    pub text: String,
    pub paragraph_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub parsed_at: String,
    pub total_paragraphs: usize,
    pub total_tables: usize,
    pub total_headings: usize,
    pub document_length: usize,
    pub pricing_tables: usize,
    pub anomalous_tables: usize,
    pub total_rules: usize,
    pub total_guidance: usize,
}

/// One parsed input file. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<Table>,
    pub blocks: Vec<Block>,
    pub rules: Vec<RuleRecord>,
    pub guidance: Vec<GuidanceRecord>,
    pub metadata: DocumentMetadata,
}

impl ParsedDocument {
    pub fn headings(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter().filter(|p| p.is_heading)
    }

    /// The heading immediately preceding a table in document order, if any.
    pub fn heading_before_table(&self, table_index: usize) -> Option<&Paragraph> {
        let pos = self
            .blocks
            .iter()
            .position(|b| *b == Block::Table(table_index))?;
        self.blocks[..pos].iter().rev().find_map(|b| match b {
            Block::Paragraph(i) => self.paragraphs.get(*i).filter(|p| p.is_heading),
            Block::Table(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// A single priced cell pulled from a pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub table_index: usize,
    pub page: u32,
    /// Absolute row in the table's grid.
    pub row_index: usize,
    pub col_index: usize,
    pub item_id: Option<String>,
    pub item_description: Option<String>,
    pub price_cents: i64,
    pub raw_text: String,
    /// Collapsed header of the cell's column, lower-cased and space-normalized.
    pub column_label: String,
}

impl PriceRecord {
    pub fn location(&self) -> Location {
        Location {
            table: self.table_index,
            row: self.row_index,
            col: self.col_index,
            page: self.page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub table: usize,
    pub row: usize,
    pub col: usize,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub item_id: String,
    pub column_label: String,
    pub item_description: Option<String>,
    pub old_price_cents: i64,
    pub new_price_cents: i64,
    /// `new_price_cents - old_price_cents`.
    pub difference_cents: i64,
    /// `difference / old * 100` when the old price is positive, else 0.
    pub percent_change: f64,
    pub old_location: Location,
    pub new_location: Location,
    pub old_raw_text: String,
    pub new_raw_text: String,
}
