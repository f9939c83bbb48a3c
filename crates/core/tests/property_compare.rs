// Property-based tests for the parse/compare pipeline.
// CI: 128 cases (default). Soak: PROPTEST_CASES=5000 cargo test --release

mod common;

use common::*;
use docdelta_core::compare;
use docdelta_core::normalize::normalize;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_prices() -> impl Strategy<Value = [i64; 3]> {
    [1i64..2_000_000, 1i64..2_000_000, 1i64..2_000_000]
}

/// 20-40 priced items with distinct ids.
fn arb_items() -> impl Strategy<Value = Vec<(String, [i64; 3])>> {
    prop::collection::vec(arb_prices(), 20..40).prop_map(|prices| {
        prices
            .into_iter()
            .enumerate()
            .map(|(i, p)| (item_id(i), p))
            .collect()
    })
}

fn arb_sentence() -> impl Strategy<Value = String> {
    let words = prop::sample::select(vec![
        "providers", "must", "should", "claim", "quote", "support", "the", "within", "days",
        "note", "example", "participants", "travel", "limit", "evidence", "approval",
    ]);
    prop::collection::vec(words, 3..14).prop_map(|w| w.join(" "))
}

/// Arbitrary cell: mostly short text, sometimes money or an id, sometimes empty.
fn arb_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[a-zA-Z ]{0,12}",
        1 => r"\$[0-9]{1,4}\.[0-9]{2}",
        1 => r"0[1-9]_[0-9]{3}_[0-9]{4}_1_1",
        1 => Just(String::new()),
    ]
}

fn arb_ragged_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(arb_cell(), 0..8), 0..12)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_128())]

    #[test]
    fn self_comparison_is_empty(
        items in arb_items(),
        sentences in prop::collection::vec(arb_sentence(), 0..8),
        filler_before in 0usize..3,
    ) {
        let mut b = DocBuilder::new().heading("Pricing arrangements", 1);
        for s in &sentences {
            b = b.body(s);
        }
        for i in 0..filler_before {
            b = b.table(filler_table(&format!("t{i}")));
        }
        let doc = b.table(pricing_table(&items)).build();

        let result = compare(&doc, &doc);
        prop_assert!(result.price_changes.is_empty());
        prop_assert!(result.rule_changes.is_empty());
        prop_assert!(result.guidance_changes.is_empty());
        prop_assert!(result.structural_changes.is_empty());
        prop_assert_eq!(result.table_changes.total(), 0);
    }

    #[test]
    fn price_matching_ignores_table_position(
        items in arb_items(),
        old_before in 0usize..4,
        new_before in 0usize..9,
    ) {
        let mut old = DocBuilder::new();
        for i in 0..old_before {
            old = old.table(filler_table(&format!("o{i}")));
        }
        let mut new = DocBuilder::new();
        for i in 0..new_before {
            new = new.table(filler_table(&format!("n{i}")));
        }
        let old = old.table(pricing_table(&items)).build();
        let new = new.table(pricing_table(&items)).build();

        prop_assert!(old.tables[old_before].is_pricing_table);
        prop_assert!(compare(&old, &new).price_changes.is_empty());
    }

    #[test]
    fn difference_sign_convention(
        old_items in arb_items(),
        new_prices in prop::collection::vec(arb_prices(), 40),
    ) {
        let new_items: Vec<(String, [i64; 3])> = old_items
            .iter()
            .zip(new_prices.iter())
            .map(|((id, _), p)| (id.clone(), *p))
            .collect();

        let old = DocBuilder::new().table(pricing_table(&old_items)).build();
        let new = DocBuilder::new().table(pricing_table(&new_items)).build();
        let result = compare(&old, &new);

        let expected: usize = old_items
            .iter()
            .zip(new_items.iter())
            .map(|((_, o), (_, n))| o.iter().zip(n.iter()).filter(|(a, b)| a != b).count())
            .sum();
        prop_assert_eq!(result.price_changes.len(), expected);

        for c in &result.price_changes {
            prop_assert_ne!(c.old_price_cents, c.new_price_cents);
            prop_assert_eq!(c.difference_cents, c.new_price_cents - c.old_price_cents);
            let pct = c.difference_cents as f64 / c.old_price_cents as f64 * 100.0;
            prop_assert!((c.percent_change - pct).abs() < 1e-9);
        }
    }

    #[test]
    fn normalized_grid_is_rectangular(rows in arb_ragged_rows(), max_header in 1usize..6) {
        let t = normalize(&rows, max_header);
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        prop_assert_eq!(t.col_count, width);
        prop_assert_eq!(t.headers.len(), width);
        prop_assert!(t.grid.iter().all(|r| r.len() == width));
        if rows.len() >= 2 {
            prop_assert!(t.header_rows >= 1);
            prop_assert!(t.header_rows <= max_header);
            prop_assert!(t.header_rows < rows.len(), "last row is never a header");
        } else {
            prop_assert_eq!(t.header_rows, rows.len());
        }
    }
}
