//! Unit tests for the active-indicator collection

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tickplot::chart::IndicatorBox;
use tickplot::indicators::{
    ChartIndicator, IndicatorError, IndicatorRegistry, IndicatorSeries, RendererKind,
};
use tickplot::models::{
    BarSeries, Candle, Category, IndicatorKey, MarkerShape, SeriesColor, StrokeStyle,
};
use tickplot::store::{default_document, ParameterStore};
use chrono::{Duration, TimeZone, Utc};

fn series(count: usize) -> BarSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = (0..count)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.5;
            Candle::new(
                close,
                close + 1.0,
                close - 1.0,
                close,
                500.0,
                start + Duration::minutes(i as i64),
            )
        })
        .collect();
    BarSeries::new("TEST", candles)
}

fn store(name: &str) -> Arc<ParameterStore> {
    let mut path = PathBuf::from(std::env::temp_dir());
    path.push(format!("tickplot-box-{}-{}.json", name, std::process::id()));
    let _ = fs::remove_file(&path);
    Arc::new(ParameterStore::create(path, default_document()).unwrap())
}

fn indicator_box(name: &str, bars: usize) -> IndicatorBox {
    IndicatorBox::new(store(name), IndicatorRegistry::with_builtins(), series(bars))
}

fn runtime_indicator(id: u32, samples: Vec<f64>) -> ChartIndicator {
    ChartIndicator {
        key: IndicatorKey::new("RuntimeLevel", id),
        subpane: false,
        category: Category::Other("annotation".to_string()),
        renderer: RendererKind::Line,
        series: vec![IndicatorSeries {
            name: "Level".to_string(),
            samples,
            color: SeriesColor::new(0, 0, 0),
            shape: MarkerShape::Cross,
            stroke: StrokeStyle::Dotted,
        }],
    }
}

#[test]
fn test_load_then_lookup_returns_built_indicator() {
    let mut indicators = indicator_box("load", 100);
    let key = IndicatorKey::new("EMAIndicator", 1);
    indicators.load(&key).unwrap();
    let built = indicators.get(&key).unwrap();
    assert_eq!(built.key, key);
    assert_eq!(built.series[0].samples.len(), 100);
}

#[test]
fn test_remove_then_lookup_is_absent() {
    let mut indicators = indicator_box("remove", 50);
    let key = IndicatorKey::new("EMAIndicator", 1);
    indicators.load(&key).unwrap();
    indicators.remove(&key);
    assert!(indicators.get(&key).is_none());
    assert!(indicators.keys().is_empty());
}

#[test]
fn test_failed_build_does_not_insert() {
    let mut indicators = indicator_box("fail", 50);
    let key = IndicatorKey::new("NoSuchType", 1);
    assert!(indicators.load(&key).is_err());
    assert!(indicators.get(&key).is_none());
}

#[test]
fn test_mapping_consistent_when_event_arrives() {
    let mut indicators = indicator_box("consistent", 60);
    let mut diffs = indicators.subscribe();
    let key = IndicatorKey::new("EMAIndicator", 1);
    indicators.load(&key).unwrap();

    // The event was queued by load; by the time it is observable the
    // mapping must already contain the key.
    let diff = diffs.try_recv().unwrap();
    assert_eq!(diff.added, vec![key.clone()]);
    assert!(diff.removed.is_empty());
    assert!(indicators.get(&key).is_some());
}

#[test]
fn test_reload_emits_in_place_update() {
    let mut indicators = indicator_box("replace", 60);
    let key = IndicatorKey::new("EMAIndicator", 1);
    indicators.load(&key).unwrap();

    let mut diffs = indicators.subscribe();
    indicators.reload(&key).unwrap();
    let diff = diffs.try_recv().unwrap();
    assert_eq!(diff.removed, vec![key.clone()]);
    assert_eq!(diff.added, vec![key]);
}

#[test]
fn test_reload_unknown_key_is_not_configured() {
    let mut indicators = indicator_box("unknown", 60);
    assert!(matches!(
        indicators.reload(&IndicatorKey::new("EMAIndicator", 77)),
        Err(IndicatorError::NotConfigured(_))
    ));
}

#[test]
fn test_runtime_indicator_reloads_from_backup_clone() {
    let mut indicators = indicator_box("runtime", 40);
    let runtime = runtime_indicator(1, vec![1.0; 40]);
    let key = runtime.key.clone();
    indicators.insert_runtime(runtime);

    indicators.reload(&key).unwrap();
    assert_eq!(indicators.get(&key).unwrap().series[0].samples, vec![1.0; 40]);
}

#[test]
fn test_reload_all_activates_configured_instances() {
    // A freshly constructed box has nothing active; reload_all brings up
    // every key present in the document, in document order.
    let mut indicators = indicator_box("activate", 80);
    assert!(indicators.is_empty());
    let errors = indicators.reload_all();
    assert!(errors.is_empty());
    assert_eq!(
        indicators.keys()[..2],
        [
            IndicatorKey::new("EMAIndicator", 1),
            IndicatorKey::new("EMAIndicator", 2),
        ]
    );
    assert_eq!(indicators.len(), 6);
}

#[test]
fn test_reload_all_collects_errors_and_removes_failures() {
    let store = store("reload-all");
    let mut indicators = IndicatorBox::new(
        store.clone(),
        IndicatorRegistry::with_builtins(),
        series(80),
    );
    indicators.reload_all();
    let active_before = indicators.len();
    assert!(active_before >= 5);

    // Break one key: the write keeps the declared Integer kind, so the
    // raw text fails decode on the next rebuild.
    let broken = IndicatorKey::new("EMAIndicator", 2);
    store.set(&broken, "Time Frame", "not-a-number").unwrap();

    let errors = indicators.reload_all();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, broken);
    assert!(matches!(
        errors[0].1,
        IndicatorError::InvalidParameterValue { .. }
    ));
    // The failed key is removed, not left stale; the rest survive.
    assert!(indicators.get(&broken).is_none());
    assert_eq!(indicators.len(), active_before - 1);
}

#[test]
fn test_duplicate_loads_new_key() {
    let mut indicators = indicator_box("duplicate", 60);
    let source = IndicatorKey::new("EMAIndicator", 1);
    indicators.load(&source).unwrap();
    let new_key = indicators.duplicate(&source).unwrap();
    assert_eq!(new_key, IndicatorKey::new("EMAIndicator", 3));
    assert!(indicators.get(&new_key).is_some());
}

#[test]
fn test_set_time_series_drops_runtime_and_rebuilds_rest() {
    let mut indicators = indicator_box("set-series", 50);
    let ema = IndicatorKey::new("EMAIndicator", 1);
    indicators.load(&ema).unwrap();
    indicators.insert_runtime(runtime_indicator(1, vec![2.0; 50]));
    let runtime_key = IndicatorKey::new("RuntimeLevel", 1);
    assert_eq!(indicators.len(), 2);

    let errors = indicators.set_time_series(series(90));
    assert!(errors.is_empty());
    assert!(indicators.get(&runtime_key).is_none());
    // Rebuilt against the new series, replacing the old samples wholesale.
    assert_eq!(indicators.get(&ema).unwrap().series[0].samples.len(), 90);
}
