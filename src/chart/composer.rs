//! Live pane layout: one price pane plus N stacked sub-panes.
//!
//! Consumes [`Diff`] events from the indicator box. Overlay indicators
//! bind into main-pane dataset slots; sub-pane indicators append their own
//! plot area sharing the one time axis. Ordering is insertion order of
//! the change events; removal clears in place and never renumbers the
//! remaining entries.

use crate::chart::axis::{SharedTimeAxis, TimeAxis};
use crate::chart::indicator_box::Diff;
use crate::indicators::{ChartIndicator, RendererKind};
use crate::models::IndicatorKey;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Which pane currently hosts the visible time-axis labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisHost {
    MainPane,
    BottomSubPane,
}

/// One occupied main-pane dataset slot
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSlot {
    pub key: IndicatorKey,
    pub series_names: Vec<String>,
    pub renderer: RendererKind,
}

/// One stacked sub-pane
#[derive(Debug, Clone)]
pub struct SubPane {
    pub key: IndicatorKey,
    pub series_names: Vec<String>,
    pub renderer: RendererKind,
    /// Clone of the composer's shared axis handle, never a copy of the axis
    pub time_axis: SharedTimeAxis,
}

/// Observable-layout snapshot for consumers and tests
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub pane_count: usize,
    pub axis_host: AxisHost,
    /// Slot occupancy in slot order; `None` is a freed slot
    pub main_slots: Vec<Option<(IndicatorKey, Vec<String>)>>,
    /// Sub-panes in insertion order
    pub sub_panes: Vec<(IndicatorKey, Vec<String>)>,
}

/// Maintains the pane layout and the dataset-slot mapping.
pub struct ChartComposer {
    time_axis: SharedTimeAxis,
    slots: Vec<Option<DatasetSlot>>,
    sub_panes: Vec<SubPane>,
    axis_host: AxisHost,
    revision: u64,
}

impl ChartComposer {
    pub fn new() -> Self {
        Self {
            time_axis: TimeAxis::shared(),
            slots: Vec::new(),
            sub_panes: Vec::new(),
            axis_host: AxisHost::MainPane,
            revision: 0,
        }
    }

    /// The main pane's time axis handle; pane index 0 never changes
    pub fn time_axis(&self) -> SharedTimeAxis {
        self.time_axis.clone()
    }

    /// Bind the visible time domain, usually the series time range
    pub fn set_time_domain(&mut self, range: Option<(DateTime<Utc>, DateTime<Utc>)>) {
        match range {
            Some((start, end)) => self.time_axis.borrow_mut().set_range(start, end),
            None => self.time_axis.borrow_mut().clear_range(),
        }
        self.revision += 1;
    }

    /// Bumped on every layout or domain change; consumers use it to
    /// invalidate derived state such as crosshair caches.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Main pane plus sub-panes
    pub fn pane_count(&self) -> usize {
        1 + self.sub_panes.len()
    }

    /// Read-only view of the stacked sub-panes, in insertion order
    pub fn sub_panes(&self) -> &[SubPane] {
        &self.sub_panes
    }

    pub fn layout(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            pane_count: self.pane_count(),
            axis_host: self.axis_host,
            main_slots: self
                .slots
                .iter()
                .map(|s| {
                    s.as_ref()
                        .map(|slot| (slot.key.clone(), slot.series_names.clone()))
                })
                .collect(),
            sub_panes: self
                .sub_panes
                .iter()
                .map(|p| (p.key.clone(), p.series_names.clone()))
                .collect(),
        }
    }

    /// Apply one diff. `lookup` resolves a key to its current indicator;
    /// a key that no longer resolves degrades to nothing drawn for that
    /// slot, it never fails the whole layout.
    pub fn apply(&mut self, diff: &Diff, lookup: &dyn Fn(&IndicatorKey) -> Option<ChartIndicator>) {
        for key in &diff.removed {
            // A key also present in `added` is an in-place update; it is
            // rebound below without releasing its slot or pane position.
            if diff.added.contains(key) {
                continue;
            }
            self.detach(key);
        }
        for key in &diff.added {
            match lookup(key) {
                Some(indicator) => self.attach(&indicator),
                None => {
                    warn!(indicator = %key, "added key no longer resolves, slot left empty");
                    self.detach(key);
                }
            }
        }
        self.settle_axis_host();
        self.revision += 1;
    }

    /// Replay the full current indicator set.
    ///
    /// Slots and panes whose keys survive keep their positions, so
    /// rebuilding a layout from its own key set leaves it observably
    /// identical, freed slot holes included. On a fresh composer this
    /// produces the same layout as incremental application of the same
    /// ordered additions.
    pub fn rebuild(&mut self, indicators: &[ChartIndicator]) {
        for slot in &mut self.slots {
            let stale = slot
                .as_ref()
                .is_some_and(|s| !indicators.iter().any(|i| !i.subpane && i.key == s.key));
            if stale {
                *slot = None;
            }
        }
        self.sub_panes
            .retain(|p| indicators.iter().any(|i| i.subpane && i.key == p.key));
        for indicator in indicators {
            self.attach(indicator);
        }
        self.settle_axis_host();
        self.revision += 1;
    }

    fn attach(&mut self, indicator: &ChartIndicator) {
        if indicator.subpane {
            self.attach_subpane(indicator);
        } else {
            self.attach_overlay(indicator);
        }
    }

    fn attach_overlay(&mut self, indicator: &ChartIndicator) {
        // An update keeps its slot; a move out of a sub-pane frees the pane.
        self.sub_panes.retain(|p| p.key != indicator.key);
        let slot = DatasetSlot {
            key: indicator.key.clone(),
            series_names: indicator.series_names(),
            renderer: indicator.renderer,
        };
        if let Some(existing) = self
            .slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.key == indicator.key))
        {
            *existing = Some(slot);
            debug!(indicator = %indicator.key, "overlay rebound in place");
            return;
        }
        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(free) => *free = Some(slot),
            None => self.slots.push(Some(slot)),
        }
        debug!(indicator = %indicator.key, "overlay bound to main pane");
    }

    fn attach_subpane(&mut self, indicator: &ChartIndicator) {
        // Mirror of the overlay case: a placement change frees the slot.
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.key == indicator.key))
        {
            *slot = None;
        }
        let pane = SubPane {
            key: indicator.key.clone(),
            series_names: indicator.series_names(),
            renderer: indicator.renderer,
            time_axis: self.time_axis.clone(),
        };
        if let Some(existing) = self.sub_panes.iter_mut().find(|p| p.key == indicator.key) {
            *existing = pane;
            debug!(indicator = %indicator.key, "sub-pane rebound in place");
            return;
        }
        self.sub_panes.push(pane);
        debug!(indicator = %indicator.key, "sub-pane appended");
    }

    /// Free the overlay slot in place or delete the sub-pane; remaining
    /// slot and pane identities keep their positions.
    fn detach(&mut self, key: &IndicatorKey) {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.key == *key))
        {
            *slot = None;
            debug!(indicator = %key, "overlay slot freed");
            return;
        }
        let before = self.sub_panes.len();
        self.sub_panes.retain(|p| p.key != *key);
        if self.sub_panes.len() != before {
            debug!(indicator = %key, "sub-pane removed");
        }
    }

    /// With no sub-panes left the time axis must come back to the main
    /// pane, otherwise the layout would be left without visible axis labels.
    fn settle_axis_host(&mut self) {
        self.axis_host = if self.sub_panes.is_empty() {
            AxisHost::MainPane
        } else {
            AxisHost::BottomSubPane
        };
    }
}

impl Default for ChartComposer {
    fn default() -> Self {
        Self::new()
    }
}
