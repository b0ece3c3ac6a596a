use proptest::prelude::*;
use sentidash::payload::{CardPayload, HistogramPayload};
use sentidash::widgets::cards::CardsView;
use sentidash::widgets::chart::{tick_labels, ChartRenderer, MAX_CATEGORY_TICKS};
use sentidash::widgets::histogram::HistogramCounters;
use sentidash::widgets::selector::SelectorView;
use sentidash::widgets::table::TableView;

fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}", i as i64 - 10)).collect()
}

proptest! {
    #[test]
    fn tick_labels_never_exceed_cap(n in 0usize..500, cap in 2usize..40) {
        let all = labels(n);
        let ticks = tick_labels(&all, cap);
        prop_assert!(ticks.len() <= cap);
        prop_assert_eq!(ticks.len(), n.min(cap));
        if n > 0 {
            prop_assert_eq!(ticks.first(), all.first());
            prop_assert_eq!(ticks.last(), all.last());
        }
    }

    #[test]
    fn chart_keeps_single_instance(renders in 1usize..20, n in 0usize..60) {
        let mut chart = ChartRenderer::default();
        for _ in 0..renders {
            chart.render(vec![0.5; n], labels(n), "all".to_string());
        }
        prop_assert_eq!(chart.live_instances(), 1);
        prop_assert_eq!(chart.instance().map(|i| i.values().len()), Some(n));
        prop_assert!(chart.tick_labels().len() <= MAX_CATEGORY_TICKS);
    }

    #[test]
    fn table_render_is_idempotent(rows in prop::collection::vec(prop::collection::vec("[a-z0-9.]{0,8}", 0..9), 0..12)) {
        let mut once = TableView::new();
        once.render(rows.clone());
        let mut twice = TableView::new();
        twice.render(rows.clone());
        twice.render(rows.clone());
        prop_assert_eq!(once.rows(), twice.rows());
        prop_assert_eq!(once.rows().len(), rows.len());
    }

    #[test]
    fn selector_populate_is_idempotent(options in prop::collection::vec("[a-z]{1,10}", 0..30)) {
        let mut selector = SelectorView::new();
        selector.populate(options.clone());
        let first: Vec<_> = selector.options().to_vec();
        let first_selected = selector.selected().map(str::to_string);
        selector.populate(options.clone());
        prop_assert_eq!(selector.options().len(), options.len());
        prop_assert_eq!(selector.options(), first.as_slice());
        prop_assert_eq!(selector.selected().map(str::to_string), first_selected);
    }

    #[test]
    fn counters_render_is_idempotent(neg in 0u32..10_000, pos in 0u32..10_000, neu in 0u32..10_000) {
        let payload = HistogramPayload { counts: vec![[neg as f64, pos as f64, neu as f64]] };
        let mut counters = HistogramCounters::new();
        counters.render_histogram(&payload);
        let negative = counters.slot("negative-count").map(str::to_string);
        counters.render_histogram(&payload);
        prop_assert_eq!(counters.slot("negative-count").map(str::to_string), negative);
        let expected = pos.to_string();
        prop_assert_eq!(counters.slot("positive-count"), Some(expected.as_str()));
    }
}

#[test]
fn test_cards_render_twice_is_stable() {
    let payload = CardPayload {
        values: vec![
            vec!["10".to_string()],
            vec!["5".to_string()],
            vec!["2.0".to_string()],
            vec!["3".to_string()],
        ],
    };
    let mut cards = CardsView::new();
    cards.render_cards(&payload);
    cards.render_cards(&payload);
    assert_eq!(cards.slot("post-count"), Some("10"));
    assert_eq!(cards.slot("average-posts"), Some("2.0"));
}

#[test]
fn test_default_chart_axis_has_21_buckets() {
    let mut chart = ChartRenderer::default();
    chart.render(vec![0.05; 21], labels(21), "all".to_string());
    assert_eq!(chart.tick_labels(), labels(21));
}
