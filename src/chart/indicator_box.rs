//! The authoritative observable collection of active indicators.
//!
//! Every mutation emits one [`Diff`] describing the keys removed and
//! added; a key present in both lists is an in-place update, not flicker.
//! Events are sent only after the map has been mutated, so a subscriber
//! draining its channel can always look up an added key successfully.

use crate::indicators::{ChartIndicator, IndicatorError, IndicatorRegistry};
use crate::models::{BarSeries, IndicatorKey, ResolvedParams};
use crate::store::{ParameterStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Keys removed/added by one operation; `removed` applies before `added`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    pub removed: Vec<IndicatorKey>,
    pub added: Vec<IndicatorKey>,
}

impl Diff {
    fn added(key: IndicatorKey) -> Self {
        Self {
            removed: Vec::new(),
            added: vec![key],
        }
    }

    fn removed(key: IndicatorKey) -> Self {
        Self {
            removed: vec![key],
            added: Vec::new(),
        }
    }

    fn replaced(key: IndicatorKey) -> Self {
        Self {
            removed: vec![key.clone()],
            added: vec![key],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Where an active entry can be rebuilt from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backing {
    /// Reconstructable from the configuration document
    Document,
    /// Added programmatically; reload clones the backup template instead
    RuntimeOnly,
}

#[derive(Debug)]
struct ActiveIndicator {
    indicator: ChartIndicator,
    backing: Backing,
}

/// Observable keyed collection of the currently active indicators.
///
/// Owns load/reload/duplicate/remove; exposes state only through these
/// operations, never through its internal containers.
pub struct IndicatorBox {
    store: Arc<ParameterStore>,
    registry: IndicatorRegistry,
    series: Arc<BarSeries>,
    active: HashMap<IndicatorKey, ActiveIndicator>,
    /// Insertion order of active keys, drives deterministic reloads
    order: Vec<IndicatorKey>,
    /// Pristine templates of runtime-added indicators, cloned on reload
    runtime_backup: HashMap<IndicatorKey, ChartIndicator>,
    subscribers: Vec<UnboundedSender<Diff>>,
}

impl IndicatorBox {
    pub fn new(store: Arc<ParameterStore>, registry: IndicatorRegistry, series: BarSeries) -> Self {
        Self {
            store,
            registry,
            series: Arc::new(series),
            active: HashMap::new(),
            order: Vec::new(),
            runtime_backup: HashMap::new(),
            subscribers: Vec::new(),
        }
    }

    /// Register a consumer; every future [`Diff`] is sent to the channel
    pub fn subscribe(&mut self) -> UnboundedReceiver<Diff> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn get(&self, key: &IndicatorKey) -> Option<&ChartIndicator> {
        self.active.get(key).map(|a| &a.indicator)
    }

    /// Active keys in insertion order
    pub fn keys(&self) -> Vec<IndicatorKey> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    /// Resolve parameters from the store, dispatch to the registry, and
    /// insert/replace the built indicator under `key`.
    pub fn load(&mut self, key: &IndicatorKey) -> Result<(), IndicatorError> {
        let indicator = self.build_from_document(key)?;
        let diff = self.insert(key.clone(), indicator, Backing::Document);
        debug!(indicator = %key, "indicator loaded");
        self.emit(diff);
        Ok(())
    }

    /// Supported path for indicators created at runtime rather than from
    /// configuration; a pristine clone is kept so reload can reproduce it.
    pub fn insert_runtime(&mut self, indicator: ChartIndicator) {
        let key = indicator.key.clone();
        self.runtime_backup.insert(key.clone(), indicator.clone());
        let diff = self.insert(key.clone(), indicator, Backing::RuntimeOnly);
        info!(indicator = %key, "runtime indicator inserted");
        self.emit(diff);
    }

    /// Re-run the build for `key`: document-backed keys rebuild from the
    /// store, runtime-added keys clone their backup template.
    pub fn reload(&mut self, key: &IndicatorKey) -> Result<(), IndicatorError> {
        if self.store.contains(key) {
            return self.load(key);
        }
        if let Some(template) = self.runtime_backup.get(key).cloned() {
            let diff = self.insert(key.clone(), template, Backing::RuntimeOnly);
            debug!(indicator = %key, "runtime indicator reloaded from backup");
            self.emit(diff);
            return Ok(());
        }
        Err(IndicatorError::NotConfigured(key.clone()))
    }

    /// Reload every active key, then load any document key not yet
    /// active, so an empty box comes up with everything configured.
    ///
    /// A key that fails is removed, not left stale; failures are
    /// collected per key and never abort the rest.
    pub fn reload_all(&mut self) -> Vec<(IndicatorKey, IndicatorError)> {
        let mut errors: Vec<(IndicatorKey, IndicatorError)> = Vec::new();
        for key in self.order.clone() {
            if let Err(err) = self.reload(&key) {
                warn!(indicator = %key, reason = %err, "reload failed, removing indicator");
                self.remove(&key);
                errors.push((key, err));
            }
        }
        for key in self.store.all_keys() {
            if self.active.contains_key(&key) || errors.iter().any(|(k, _)| *k == key) {
                continue;
            }
            if let Err(err) = self.load(&key) {
                warn!(indicator = %key, reason = %err, "configured indicator not loaded");
                errors.push((key, err));
            }
        }
        errors
    }

    /// Clone the instance node in the store, then load the new key
    pub fn duplicate(&mut self, key: &IndicatorKey) -> Result<IndicatorKey, IndicatorError> {
        let new_key = self.store.duplicate(key)?;
        self.load(&new_key)?;
        Ok(new_key)
    }

    /// Delete from the active mapping only; document-backed entries stay
    /// in the document so a later reload can reconstruct them.
    pub fn remove(&mut self, key: &IndicatorKey) {
        if self.active.remove(key).is_none() {
            return;
        }
        self.order.retain(|k| k != key);
        self.runtime_backup.remove(key);
        debug!(indicator = %key, "indicator removed");
        self.emit(Diff::removed(key.clone()));
    }

    /// Replace the series used by all future builds.
    ///
    /// Runtime-added entries are dropped: they are not reproducible
    /// against a new series without their construction context. Everything
    /// else is reloaded; per-key failures are returned, not thrown.
    pub fn set_time_series(&mut self, series: BarSeries) -> Vec<(IndicatorKey, IndicatorError)> {
        info!(
            symbol = %series.symbol,
            bars = series.len(),
            "time series replaced"
        );
        self.series = Arc::new(series);
        let runtime_keys: Vec<IndicatorKey> = self
            .order
            .iter()
            .filter(|k| {
                matches!(
                    self.active.get(*k).map(|a| a.backing),
                    Some(Backing::RuntimeOnly)
                )
            })
            .cloned()
            .collect();
        for key in runtime_keys {
            self.remove(&key);
        }
        self.reload_all()
    }

    fn build_from_document(&self, key: &IndicatorKey) -> Result<ChartIndicator, IndicatorError> {
        let descriptors = self.store.parameters_for(key).map_err(|e| match e {
            StoreError::NotConfigured(_) => IndicatorError::NotConfigured(key.clone()),
            other => IndicatorError::Store(other),
        })?;
        let params = ResolvedParams::decode(&descriptors)?;
        let category = self.store.category(key);
        self.registry
            .build(key.clone(), category, &self.series, &params)
    }

    /// Mutate the map first, then describe the change; `emit` runs after,
    /// so subscribers always observe a consistent mapping.
    fn insert(
        &mut self,
        key: IndicatorKey,
        indicator: ChartIndicator,
        backing: Backing,
    ) -> Diff {
        let replaced = self
            .active
            .insert(key.clone(), ActiveIndicator { indicator, backing })
            .is_some();
        if replaced {
            Diff::replaced(key)
        } else {
            self.order.push(key.clone());
            Diff::added(key)
        }
    }

    fn emit(&mut self, diff: Diff) {
        if diff.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(diff.clone()).is_ok());
    }
}
