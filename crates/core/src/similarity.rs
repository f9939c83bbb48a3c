use std::collections::HashMap;

/// A normalized text-similarity metric on a 0-100 scale.
///
/// Implementations must return 100 for identical texts. `upper_bound` lets the
/// matcher skip candidates cheaply; the default never prunes.
pub trait TextSimilarity {
    fn score(&self, a: &str, b: &str) -> u8;

    /// Best score any pair of texts with these char lengths could reach.
    fn upper_bound(&self, _len_a: usize, _len_b: usize) -> u8 {
        100
    }
}

/// Levenshtein edit distance over chars, as a floored percentage of the
/// longer text. Distinct texts never reach 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinRatio;

impl TextSimilarity for LevenshteinRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        if a == b {
            return 100;
        }
        let ratio = strsim::normalized_levenshtein(a, b);
        ((ratio * 100.0).floor() as u8).min(99)
    }

    fn upper_bound(&self, len_a: usize, len_b: usize) -> u8 {
        let (short, long) = if len_a <= len_b { (len_a, len_b) } else { (len_b, len_a) };
        if long == 0 {
            return 100;
        }
        (short * 100 / long) as u8
    }
}

/// One side's texts, prepared for repeated best-match queries.
pub struct CandidateSet<'a> {
    texts: Vec<&'a str>,
    lengths: Vec<usize>,
    exact: HashMap<&'a str, usize>,
}

impl<'a> CandidateSet<'a> {
    pub fn new(texts: Vec<&'a str>) -> Self {
        let lengths = texts.iter().map(|t| t.chars().count()).collect();
        let mut exact = HashMap::with_capacity(texts.len());
        for (i, t) in texts.iter().enumerate() {
            exact.entry(*t).or_insert(i);
        }
        Self {
            texts,
            lengths,
            exact,
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Highest-scoring candidate at or above `threshold`, as `(index, score)`.
    /// Ties go to the earliest candidate.
    pub fn best_match(
        &self,
        needle: &str,
        threshold: u8,
        metric: &dyn TextSimilarity,
    ) -> Option<(usize, u8)> {
        if let Some(&i) = self.exact.get(needle) {
            return Some((i, 100));
        }
        let needle_len = needle.chars().count();
        let mut best: Option<(usize, u8)> = None;
        for (i, text) in self.texts.iter().enumerate() {
            let floor = best.map_or(threshold, |(_, s)| s.saturating_add(1).max(threshold));
            if metric.upper_bound(needle_len, self.lengths[i]) < floor {
                continue;
            }
            let score = metric.score(needle, text);
            if score >= threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_scores_100() {
        assert_eq!(LevenshteinRatio.score("abc", "abc"), 100);
        assert_eq!(LevenshteinRatio.score("", ""), 100);
    }

    #[test]
    fn near_identical_is_below_100() {
        let a = "x".repeat(300);
        let b = format!("{}y", "x".repeat(299));
        assert_eq!(LevenshteinRatio.score(&a, &b), 99);
    }

    #[test]
    fn rule_edit_scores_above_85() {
        let old = "Providers must obtain quotes for supports valued at $15,000 or more.";
        let new = "Providers must obtain a quote for supports valued at $16,000 or more.";
        let s = LevenshteinRatio.score(old, new);
        assert!((85..100).contains(&s), "got {s}");
    }

    #[test]
    fn bound_never_below_score() {
        let pairs = [("kitten", "sitting"), ("a", "abcdef"), ("", "abc"), ("same", "same")];
        for (a, b) in pairs {
            let bound = LevenshteinRatio.upper_bound(a.chars().count(), b.chars().count());
            assert!(LevenshteinRatio.score(a, b) <= bound, "{a} / {b}");
        }
    }

    #[test]
    fn best_match_picks_highest_and_respects_threshold() {
        let set = CandidateSet::new(vec![
            "completely unrelated text",
            "The quick brown fox jumps",
            "The quick brown fox jumped",
        ]);
        let (i, s) = set
            .best_match("The quick brown fox jumped!", 80, &LevenshteinRatio)
            .unwrap();
        assert_eq!(i, 2);
        assert!(s >= 80);
        assert!(set.best_match("nothing alike at all", 80, &LevenshteinRatio).is_none());
    }

    #[test]
    fn exact_match_prefers_first_duplicate() {
        let set = CandidateSet::new(vec!["a b c", "dup", "dup"]);
        assert_eq!(set.best_match("dup", 85, &LevenshteinRatio), Some((1, 100)));
    }

    #[test]
    fn ties_keep_earliest() {
        let set = CandidateSet::new(vec!["abcx", "abcy"]);
        assert_eq!(set.best_match("abcz", 50, &LevenshteinRatio), Some((0, 75)));
    }
}
