//! Shared time axis and chart-area geometry.

use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;

/// Chart-area rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartArea {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The one time axis of a chart.
///
/// The main pane and every sub-pane hold clones of the same
/// [`SharedTimeAxis`] handle, so panning and zooming one pane moves all
/// of them. It is never copied per pane.
#[derive(Debug, Default)]
pub struct TimeAxis {
    /// Visible domain as epoch milliseconds, `None` before any series is bound
    range: Option<(i64, i64)>,
}

pub type SharedTimeAxis = Rc<RefCell<TimeAxis>>;

impl TimeAxis {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedTimeAxis {
        Rc::new(RefCell::new(Self::unset()))
    }

    pub fn set_range(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.range = Some((start.timestamp_millis(), end.timestamp_millis()));
    }

    pub fn clear_range(&mut self) {
        self.range = None;
    }

    pub fn range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = self.range?;
        Some((
            Utc.timestamp_millis_opt(start).single()?,
            Utc.timestamp_millis_opt(end).single()?,
        ))
    }

    /// Inverse-map a pixel x position inside `area` to a domain time.
    ///
    /// Positions outside the area or outside the bound domain yield
    /// `None`, never an extrapolated value.
    pub fn to_domain(&self, px: f64, area: &ChartArea) -> Option<DateTime<Utc>> {
        let (start, end) = self.range?;
        if area.width <= 0.0 || px < area.x || px > area.x + area.width {
            return None;
        }
        let fraction = (px - area.x) / area.width;
        let millis = start + (fraction * (end - start) as f64).round() as i64;
        Utc.timestamp_millis_opt(millis).single()
    }
}
