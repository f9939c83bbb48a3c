//! Business-rule and guidance records pulled from body paragraphs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{GuidanceRecord, Paragraph, RuleCategory, RuleEntities, RuleRecord, RuleTier};

static RULE_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:must|should|shall|may not|required|mandatory|conditions?|thresholds?|limits?|maximum|minimum|claiming|quotes?|evidence|approvals?)\b",
    )
    .unwrap()
});

/// Category patterns in priority order; the first hit wins.
static CATEGORY_PATTERNS: Lazy<Vec<(RuleCategory, Regex)>> = Lazy::new(|| {
    [
        (RuleCategory::Claiming, r"(?i)\bclaim(?:s|ed|ing)?\b"),
        (RuleCategory::Quoting, r"(?i)\bquot(?:e|es|ed|ing)\b"),
        (RuleCategory::Evidence, r"(?i)\bevidence\b"),
        (RuleCategory::Approval, r"(?i)\bapprov(?:al|als|e|ed)\b"),
        (
            RuleCategory::Condition,
            r"(?i)\b(?:if|when|where|provided that|conditions?)\b",
        ),
        (
            RuleCategory::Threshold,
            r"(?i)\b(?:thresholds?|limits?|maximum|minimum)\b",
        ),
    ]
    .into_iter()
    .map(|(cat, p)| (cat, Regex::new(p).unwrap()))
    .collect()
});

static TIER_MANDATORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:must|shall|required|mandatory|may not)\b").unwrap());
static TIER_RECOMMENDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:should|recommended)\b").unwrap());
static TIER_OPTIONAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:may|can)\b").unwrap());

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s?\d{1,3}(?:,\d{3})+(?:\.\d+)?|\$\s?\d+(?:\.\d+)?").unwrap());
static PERCENTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?\s?%").unwrap());
static PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+\s(?:business\s)?(?:hours?|days?|weeks?|months?|years?)\b").unwrap()
});

static GUIDANCE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:guidance|notes?|examples?|information|consider|background|context|purpose|overview)\b",
    )
    .unwrap()
});

/// Body paragraphs longer than this count as guidance even without a keyword.
const GUIDANCE_MIN_CHARS: usize = 50;

pub fn is_rule_candidate(text: &str) -> bool {
    RULE_CANDIDATE.is_match(text)
}

pub fn rule_category(text: &str) -> RuleCategory {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(cat, _)| *cat)
        .unwrap_or(RuleCategory::Requirement)
}

pub fn rule_tier(text: &str) -> RuleTier {
    if TIER_MANDATORY.is_match(text) {
        RuleTier::Mandatory
    } else if TIER_RECOMMENDED.is_match(text) {
        RuleTier::Recommended
    } else if TIER_OPTIONAL.is_match(text) {
        RuleTier::Optional
    } else {
        RuleTier::Informational
    }
}

pub fn rule_entities(text: &str) -> RuleEntities {
    RuleEntities {
        amounts: find_all(&AMOUNT, text),
        percentages: find_all(&PERCENTAGE, text),
        periods: find_all(&PERIOD, text),
    }
}

fn find_all(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// One rule per non-heading paragraph that uses rule language.
pub fn extract_rules(paragraphs: &[Paragraph]) -> Vec<RuleRecord> {
    paragraphs
        .iter()
        .filter(|p| !p.is_heading && is_rule_candidate(&p.text))
        .map(|p| RuleRecord {
            category: rule_category(&p.text),
            tier: rule_tier(&p.text),
            text: p.text.clone(),
            paragraph_index: p.index,
            entities: rule_entities(&p.text),
        })
        .collect()
}

/// Guidance paragraphs, each tagged with the heading it sits under.
/// Paragraphs before the first heading are never guidance.
pub fn extract_guidance(paragraphs: &[Paragraph]) -> Vec<GuidanceRecord> {
    let mut section: Option<&Paragraph> = None;
    let mut records = Vec::new();

    for p in paragraphs {
        if p.is_heading {
            section = Some(p);
            continue;
        }
        let Some(heading) = section else {
            continue;
        };
        if GUIDANCE_KEYWORD.is_match(&p.text) || p.text.chars().count() > GUIDANCE_MIN_CHARS {
            records.push(GuidanceRecord {
                section: heading.text.clone(),
                section_level: heading.heading_level,
                text: p.text.clone(),
                paragraph_index: p.index,
            });
        }
    }

    records
}
