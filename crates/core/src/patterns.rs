//! Text recognizers shared by the normalizer, classifier and extractor.

use once_cell::sync::Lazy;
use regex::Regex;

/// Support-item identifier shapes, most specific first.
static ITEM_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d{2}_\d{3}_\d{4}_\d+_\d+",
        r"\d{2}_\d{3}_\d{4}",
        r"\d{2}_\d{3}",
        r"\d+\.\d+\.\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Whole cell is a money amount: a currency marker with a number, or a bare
/// number with exactly two decimals.
static MONETARY_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:A\$|AUD\s?|\$|€|£)\s*\d{1,3}(?:,?\d{3})*(?:\.\d{1,2})?|\d{1,3}(?:,?\d{3})*\.\d{2})$",
    )
    .unwrap()
});

/// A money amount anywhere in the text.
static MONEY_ANYWHERE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\$\s*\d|(?:^|[^\d.,])\d{1,3}(?:,\d{3})*\.\d{2}(?:$|[^\d]))").unwrap()
});

static NUMERIC_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{3,}|\d+(?:[_.]\d+)+)$").unwrap());

static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)(?:\.([0-9]+))?").unwrap());

const CURRENCY_MARKERS: &[&str] = &["AUD", "A$", "$", "€", "£"];

/// First item identifier found in `text`, trying the most specific shape first.
pub fn extract_item_id(text: &str) -> Option<&str> {
    ITEM_ID_PATTERNS
        .iter()
        .find_map(|re| re.find(text).map(|m| m.as_str()))
}

pub fn has_item_id(text: &str) -> bool {
    extract_item_id(text).is_some()
}

/// True when the whole (trimmed) cell reads as a money amount.
pub fn looks_monetary(text: &str) -> bool {
    MONETARY_CELL.is_match(text.trim())
}

pub fn contains_money(text: &str) -> bool {
    MONEY_ANYWHERE.is_match(text)
}

/// Bare numeric tokens such as `0104` or `1.2.3` that mark a data row.
pub fn is_numeric_code(text: &str) -> bool {
    NUMERIC_CODE.is_match(text.trim())
}

/// Parse a price cell into integer cents.
///
/// Currency markers and thousands separators are dropped, then the first
/// integer-or-decimal token anywhere in the cell is read, so `From $12.50`
/// parses as 1250. Callers skip item-code cells before getting here.
/// Fractions beyond two digits round half up. Returns `None` when no token is
/// present or the value overflows.
pub fn parse_price_cents(text: &str) -> Option<i64> {
    let mut cleaned = text.replace(',', "");
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, " ");
    }
    let caps = NUMBER_TOKEN.captures(&cleaned)?;

    let whole: i64 = caps[1].parse().ok()?;
    let frac = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let digits: Vec<i64> = frac
        .bytes()
        .take(3)
        .map(|b| i64::from(b - b'0'))
        .collect();
    let tenths = digits.first().copied().unwrap_or(0);
    let hundredths = digits.get(1).copied().unwrap_or(0);
    let round_up = i64::from(digits.get(2).is_some_and(|d| *d >= 5));

    whole
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + round_up)
}

/// Lower-case and collapse internal whitespace, for label comparison.
pub fn normalize_label(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trim and collapse runs of whitespace (including newlines) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
