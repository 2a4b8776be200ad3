//! Unit tests for the crosshair readout

use tickplot::chart::{ChartArea, ChartComposer, CrosshairSync, Diff};
use tickplot::indicators::{ChartIndicator, IndicatorSeries, RendererKind};
use tickplot::models::{
    BarSeries, Candle, Category, IndicatorKey, MarkerShape, SeriesColor, StrokeStyle,
};
use chrono::{Duration, TimeZone, Utc};

fn series(count: usize) -> BarSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = (0..count)
        .map(|i| {
            let close = 10.0 + i as f64;
            Candle::new(
                close,
                close + 0.5,
                close - 0.5,
                close,
                100.0,
                start + Duration::minutes(i as i64),
            )
        })
        .collect();
    BarSeries::new("TEST", candles)
}

fn composer_for(bars: &BarSeries) -> ChartComposer {
    let mut composer = ChartComposer::new();
    composer.set_time_domain(bars.time_range());
    composer
}

fn area() -> ChartArea {
    ChartArea::new(0.0, 0.0, 100.0, 50.0)
}

#[test]
fn test_readout_with_price_only_main_pane() {
    let bars = series(11);
    let composer = composer_for(&bars);
    let mut crosshair = CrosshairSync::new();

    // Halfway across the 10-minute domain: bar index 5, close 15.
    let readout = crosshair
        .readout(&composer, &bars, &area(), (50.0, 25.0))
        .unwrap();
    assert_eq!(readout.bar_index, 5);
    assert_eq!(readout.value, 15.0);
}

#[test]
fn test_pointer_snaps_to_bar_at_or_before() {
    let bars = series(11);
    let composer = composer_for(&bars);
    let mut crosshair = CrosshairSync::new();

    // 47% across lands between bars 4 and 5.
    let readout = crosshair
        .readout(&composer, &bars, &area(), (47.0, 0.0))
        .unwrap();
    assert_eq!(readout.bar_index, 4);
    assert_eq!(readout.time, bars.candles[4].timestamp);
}

#[test]
fn test_out_of_area_pointer_is_none() {
    let bars = series(11);
    let composer = composer_for(&bars);
    let mut crosshair = CrosshairSync::new();
    assert!(crosshair
        .readout(&composer, &bars, &area(), (150.0, 25.0))
        .is_none());
    assert!(crosshair
        .readout(&composer, &bars, &area(), (-5.0, 25.0))
        .is_none());
}

#[test]
fn test_unbound_axis_is_none() {
    let bars = series(11);
    let composer = ChartComposer::new();
    let mut crosshair = CrosshairSync::new();
    assert!(crosshair
        .readout(&composer, &bars, &area(), (50.0, 25.0))
        .is_none());
}

#[test]
fn test_empty_series_is_none() {
    let bars = BarSeries::new("EMPTY", Vec::new());
    let mut composer = ChartComposer::new();
    composer.set_time_domain(None);
    let mut crosshair = CrosshairSync::new();
    assert!(crosshair
        .readout(&composer, &bars, &area(), (50.0, 25.0))
        .is_none());
}

#[test]
fn test_resize_invalidates_previous_readout() {
    let bars = series(11);
    let composer = composer_for(&bars);
    let mut crosshair = CrosshairSync::new();

    let wide = area();
    assert!(crosshair
        .readout(&composer, &bars, &wide, (50.0, 25.0))
        .is_some());

    // Same pointer and revision, but the chart shrank underneath it; the
    // pointer is now outside the area and must not hit stale data.
    let narrow = ChartArea::new(0.0, 0.0, 40.0, 50.0);
    assert!(crosshair
        .readout(&composer, &bars, &narrow, (50.0, 25.0))
        .is_none());

    // A resize that keeps the pointer inside remaps it, 50px of 200 is
    // a quarter across the domain.
    let doubled = ChartArea::new(0.0, 0.0, 200.0, 50.0);
    let readout = crosshair
        .readout(&composer, &bars, &doubled, (50.0, 25.0))
        .unwrap();
    assert_eq!(readout.bar_index, 2);
}

#[test]
fn test_recomputes_after_layout_change() {
    let bars = series(11);
    let mut composer = composer_for(&bars);
    let mut crosshair = CrosshairSync::new();

    let first = crosshair
        .readout(&composer, &bars, &area(), (50.0, 25.0))
        .unwrap();

    // A sub-pane appears; the readout must stay correct against the
    // changed layout, not a stale cache.
    let sub = ChartIndicator {
        key: IndicatorKey::new("RSIIndicator", 1),
        subpane: true,
        category: Category::Momentum,
        renderer: RendererKind::Line,
        series: vec![IndicatorSeries {
            name: "RSI 14".to_string(),
            samples: vec![50.0; 11],
            color: SeriesColor::new(1, 2, 3),
            shape: MarkerShape::Circle,
            stroke: StrokeStyle::Solid,
        }],
    };
    let diff = Diff {
        removed: Vec::new(),
        added: vec![sub.key.clone()],
    };
    composer.apply(&diff, &move |k| {
        if *k == sub.key {
            Some(sub.clone())
        } else {
            None
        }
    });

    let second = crosshair
        .readout(&composer, &bars, &area(), (50.0, 25.0))
        .unwrap();
    // Sub-panes affect only layout, never the main-pane Y readout.
    assert_eq!(first, second);
}
