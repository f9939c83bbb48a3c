use serde::Serialize;

use crate::classify::count_price_headers;
use crate::config::AnomalyConfig;

/// Why a table's column layout is unsafe for cross-version price comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum AnomalyReason {
    /// A header names a sub-national region.
    RegionHeader(String),
    /// More price-like headers than the national/remote/very-remote layout has.
    ExpandedPriceHeaders(usize),
    TooManyColumns(usize),
}

impl std::fmt::Display for AnomalyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegionHeader(h) => write!(f, "region header '{h}'"),
            Self::ExpandedPriceHeaders(n) => write!(f, "{n} price headers"),
            Self::TooManyColumns(n) => write!(f, "{n} columns"),
        }
    }
}

/// Every anomaly signal that fires for a table. Empty means safe to compare.
pub fn detect(headers: &[String], col_count: usize, config: &AnomalyConfig) -> Vec<AnomalyReason> {
    let mut reasons = Vec::new();

    if let Some(h) = headers
        .iter()
        .find(|h| config.region_tokens.iter().any(|t| header_names_region(h, t)))
    {
        reasons.push(AnomalyReason::RegionHeader(h.clone()));
    }

    let price_headers = count_price_headers(headers);
    if price_headers > config.max_price_headers {
        reasons.push(AnomalyReason::ExpandedPriceHeaders(price_headers));
    }

    if col_count > config.max_columns {
        reasons.push(AnomalyReason::TooManyColumns(col_count));
    }

    reasons
}

pub fn is_anomalous(headers: &[String], col_count: usize, config: &AnomalyConfig) -> bool {
    !detect(headers, col_count, config).is_empty()
}

/// Short upper-case codes (`NSW`, `SA`) must appear as an exact whole word so
/// ordinary words do not trip them. Longer tokens match as a phrase, ignoring case.
fn header_names_region(header: &str, token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    let is_code = token.chars().count() <= 3 && token.chars().all(|c| c.is_ascii_uppercase());
    if is_code {
        header
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == token)
    } else {
        header.to_lowercase().contains(&token.to_lowercase())
    }
}
