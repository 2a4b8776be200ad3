//! Unit tests for the pane-layout composer

use std::rc::Rc;
use tickplot::chart::{AxisHost, ChartComposer, Diff};
use tickplot::indicators::{ChartIndicator, IndicatorSeries, RendererKind};
use tickplot::models::{
    Category, IndicatorKey, MarkerShape, SeriesColor, StrokeStyle,
};

fn indicator(type_id: &str, id: u32, subpane: bool) -> ChartIndicator {
    ChartIndicator {
        key: IndicatorKey::new(type_id, id),
        subpane,
        category: Category::Default,
        renderer: RendererKind::Line,
        series: vec![IndicatorSeries {
            name: format!("{type_id} {id}"),
            samples: vec![1.0, 2.0, 3.0],
            color: SeriesColor::new(10, 20, 30),
            shape: MarkerShape::Circle,
            stroke: StrokeStyle::Solid,
        }],
    }
}

fn apply_added(composer: &mut ChartComposer, indicators: &[ChartIndicator]) {
    for ind in indicators {
        let diff = Diff {
            removed: Vec::new(),
            added: vec![ind.key.clone()],
        };
        let pool = indicators.to_vec();
        composer.apply(&diff, &move |key| {
            pool.iter().find(|i| i.key == *key).cloned()
        });
    }
}

fn apply_removed(composer: &mut ChartComposer, key: &IndicatorKey) {
    let diff = Diff {
        removed: vec![key.clone()],
        added: Vec::new(),
    };
    composer.apply(&diff, &|_| None);
}

#[test]
fn test_overlay_takes_next_free_slot() {
    let mut composer = ChartComposer::new();
    let overlays = vec![
        indicator("EMAIndicator", 1, false),
        indicator("EMAIndicator", 2, false),
    ];
    apply_added(&mut composer, &overlays);

    let layout = composer.layout();
    assert_eq!(layout.pane_count, 1);
    assert_eq!(layout.main_slots.len(), 2);
    assert_eq!(
        layout.main_slots[0].as_ref().unwrap().0,
        IndicatorKey::new("EMAIndicator", 1)
    );
}

#[test]
fn test_removal_clears_slot_without_renumbering() {
    let mut composer = ChartComposer::new();
    apply_added(
        &mut composer,
        &[
            indicator("EMAIndicator", 1, false),
            indicator("SMAIndicator", 1, false),
        ],
    );
    apply_removed(&mut composer, &IndicatorKey::new("EMAIndicator", 1));

    let layout = composer.layout();
    // Slot 0 is freed in place; the SMA keeps slot index 1.
    assert!(layout.main_slots[0].is_none());
    assert_eq!(
        layout.main_slots[1].as_ref().unwrap().0,
        IndicatorKey::new("SMAIndicator", 1)
    );
}

#[test]
fn test_freed_slot_is_reused_by_next_overlay() {
    let mut composer = ChartComposer::new();
    apply_added(
        &mut composer,
        &[
            indicator("EMAIndicator", 1, false),
            indicator("SMAIndicator", 1, false),
        ],
    );
    apply_removed(&mut composer, &IndicatorKey::new("EMAIndicator", 1));
    apply_added(&mut composer, &[indicator("BollingerBands", 1, false)]);

    let layout = composer.layout();
    assert_eq!(layout.main_slots.len(), 2);
    assert_eq!(
        layout.main_slots[0].as_ref().unwrap().0,
        IndicatorKey::new("BollingerBands", 1)
    );
}

#[test]
fn test_sub_panes_append_in_event_order() {
    let mut composer = ChartComposer::new();
    apply_added(
        &mut composer,
        &[
            indicator("RSIIndicator", 1, true),
            indicator("MACDIndicator", 1, true),
        ],
    );

    let layout = composer.layout();
    assert_eq!(layout.pane_count, 3);
    assert_eq!(layout.sub_panes[0].0, IndicatorKey::new("RSIIndicator", 1));
    assert_eq!(layout.sub_panes[1].0, IndicatorKey::new("MACDIndicator", 1));
    assert_eq!(layout.axis_host, AxisHost::BottomSubPane);
}

#[test]
fn test_removing_last_sub_pane_reattaches_axis() {
    let mut composer = ChartComposer::new();
    apply_added(&mut composer, &[indicator("RSIIndicator", 1, true)]);
    assert_eq!(composer.layout().axis_host, AxisHost::BottomSubPane);

    apply_removed(&mut composer, &IndicatorKey::new("RSIIndicator", 1));
    let layout = composer.layout();
    assert_eq!(layout.pane_count, 1);
    assert_eq!(layout.axis_host, AxisHost::MainPane);
}

#[test]
fn test_panes_share_one_time_axis_object() {
    let mut composer = ChartComposer::new();
    apply_added(
        &mut composer,
        &[
            indicator("RSIIndicator", 1, true),
            indicator("MACDIndicator", 1, true),
        ],
    );
    // Identity, not equality: every pane holds the same axis object.
    let axis = composer.time_axis();
    for pane in composer.sub_panes() {
        assert!(Rc::ptr_eq(&axis, &pane.time_axis));
    }
}

#[test]
fn test_in_place_update_keeps_positions() {
    let mut composer = ChartComposer::new();
    apply_added(
        &mut composer,
        &[
            indicator("RSIIndicator", 1, true),
            indicator("MACDIndicator", 1, true),
        ],
    );

    // Reload-style diff for the first sub-pane.
    let updated = indicator("RSIIndicator", 1, true);
    let key = updated.key.clone();
    let diff = Diff {
        removed: vec![key.clone()],
        added: vec![key.clone()],
    };
    composer.apply(&diff, &move |k| {
        if *k == updated.key {
            Some(updated.clone())
        } else {
            None
        }
    });

    let layout = composer.layout();
    assert_eq!(layout.sub_panes[0].0, key);
    assert_eq!(layout.sub_panes.len(), 2);
}

#[test]
fn test_unresolvable_added_key_degrades_to_nothing_drawn() {
    let mut composer = ChartComposer::new();
    let diff = Diff {
        removed: Vec::new(),
        added: vec![IndicatorKey::new("Ghost", 1)],
    };
    composer.apply(&diff, &|_| None);
    let layout = composer.layout();
    assert_eq!(layout.pane_count, 1);
    assert!(layout.main_slots.iter().all(|s| s.is_none()));
}

#[test]
fn test_recomposition_is_idempotent() {
    let set = vec![
        indicator("EMAIndicator", 1, false),
        indicator("RSIIndicator", 1, true),
        indicator("SMAIndicator", 1, false),
        indicator("MACDIndicator", 1, true),
    ];

    let mut incremental = ChartComposer::new();
    apply_added(&mut incremental, &set);

    let mut replayed = ChartComposer::new();
    replayed.rebuild(&set);

    assert_eq!(incremental.layout(), replayed.layout());
}

#[test]
fn test_rebuild_preserves_holes_after_removal() {
    let mut composer = ChartComposer::new();
    apply_added(
        &mut composer,
        &[
            indicator("EMAIndicator", 1, false),
            indicator("SMAIndicator", 1, false),
            indicator("WMAIndicator", 1, false),
            indicator("RSIIndicator", 1, true),
        ],
    );
    apply_removed(&mut composer, &IndicatorKey::new("SMAIndicator", 1));

    let before = composer.layout();
    assert!(before.main_slots[1].is_none());

    let survivors = vec![
        indicator("EMAIndicator", 1, false),
        indicator("WMAIndicator", 1, false),
        indicator("RSIIndicator", 1, true),
    ];
    composer.rebuild(&survivors);

    let after = composer.layout();
    assert_eq!(before, after);
    assert!(after.main_slots[1].is_none());
    assert_eq!(
        after.main_slots[2].as_ref().unwrap().0,
        IndicatorKey::new("WMAIndicator", 1)
    );
}

#[test]
fn test_revision_bumps_on_layout_change() {
    let mut composer = ChartComposer::new();
    let before = composer.revision();
    apply_added(&mut composer, &[indicator("EMAIndicator", 1, false)]);
    assert!(composer.revision() > before);
}
