use std::sync::Arc;
use tickplot::chart::{ChartArea, ChartSession};
use tickplot::config::Config;
use tickplot::indicators::IndicatorRegistry;
use tickplot::logging::init_logging;
use tickplot::services::{spawn_feed, SyntheticProvider};
use tickplot::store::{default_document, ParameterStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_logging();
    info!(environment = %config.environment, "tickplot starting");

    let store = Arc::new(ParameterStore::open(&config.document_path)?);
    store.populate_if_empty(default_document())?;

    // Acquisition runs on a worker; the series is handed back here before
    // it ever touches chart state.
    let provider = Arc::new(SyntheticProvider::new(100.0));
    let mut feed = spawn_feed(provider, "DEMO".to_string(), 240);
    let series = feed
        .recv()
        .await
        .ok_or("feed worker ended without a series")?;

    let mut session = ChartSession::new(store, IndicatorRegistry::with_builtins(), series);
    for (key, err) in session.indicators().reload_all() {
        warn!(indicator = %key, reason = %err, "configured indicator skipped");
    }
    session.pump();

    let layout = session.layout();
    info!(
        panes = layout.pane_count,
        overlays = layout.main_slots.iter().filter(|s| s.is_some()).count(),
        sub_panes = layout.sub_panes.len(),
        "chart composed"
    );
    for (key, names) in &layout.sub_panes {
        info!(indicator = %key, series = ?names, "sub-pane");
    }

    let area = ChartArea::new(0.0, 0.0, 800.0, 400.0);
    if let Some(readout) = session.readout(&area, (400.0, 120.0)) {
        info!(
            time = %readout.time,
            bar = readout.bar_index,
            value = readout.value,
            "crosshair readout"
        );
    }

    Ok(())
}
