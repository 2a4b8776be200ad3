//! Built-in indicator constructors.
//!
//! The math here is deliberately minimal rolling-window arithmetic; the
//! rest of the engine treats every constructor as an opaque pure function
//! of the bar series and its parameters. Each output vector carries one
//! sample per bar, NaN-padded where the window has not filled yet.

use crate::indicators::chart_indicator::{IndicatorSeries, RendererKind};
use crate::indicators::error::IndicatorError;
use crate::indicators::registry::IndicatorBody;
use crate::models::{
    BarSeries, ChartPlacement, MarkerShape, ResolvedParams, SeriesColor, StrokeStyle,
};

const TIME_FRAME: &str = "Time Frame";
const COLOR: &str = "Color";
const SHAPE: &str = "Shape";
const STROKE: &str = "Stroke";
const PLACEMENT: &str = "Placement";

fn window(params: &ResolvedParams, name: &str) -> Result<usize, IndicatorError> {
    let frame = params.integer(name)?;
    if frame < 1 {
        return Err(IndicatorError::InvalidParameterValue {
            name: name.to_string(),
            raw: frame.to_string(),
        });
    }
    Ok(frame as usize)
}

fn styled_series(
    name: &str,
    samples: Vec<f64>,
    params: &ResolvedParams,
    default_color: SeriesColor,
) -> Result<IndicatorSeries, IndicatorError> {
    Ok(IndicatorSeries {
        name: name.to_string(),
        samples,
        color: params.color_or(COLOR, default_color)?,
        shape: params.shape_or(SHAPE, MarkerShape::Circle)?,
        stroke: params.stroke_or(STROKE, StrokeStyle::Solid)?,
    })
}

/// Exponential moving average of closes
pub fn build_ema(series: &BarSeries, params: &ResolvedParams) -> Result<IndicatorBody, IndicatorError> {
    let period = window(params, TIME_FRAME)?;
    let samples = ema(&series.closes(), period);
    Ok(IndicatorBody {
        subpane: matches!(
            params.placement_or(PLACEMENT, ChartPlacement::Overlay)?,
            ChartPlacement::Subpane
        ),
        renderer: RendererKind::Line,
        series: vec![styled_series(
            &format!("EMA {period}"),
            samples,
            params,
            SeriesColor::new(0x1f, 0x77, 0xb4),
        )?],
    })
}

/// Simple moving average of closes
pub fn build_sma(series: &BarSeries, params: &ResolvedParams) -> Result<IndicatorBody, IndicatorError> {
    let period = window(params, TIME_FRAME)?;
    let samples = sma(&series.closes(), period);
    Ok(IndicatorBody {
        subpane: matches!(
            params.placement_or(PLACEMENT, ChartPlacement::Overlay)?,
            ChartPlacement::Subpane
        ),
        renderer: RendererKind::Line,
        series: vec![styled_series(
            &format!("SMA {period}"),
            samples,
            params,
            SeriesColor::new(0x2c, 0xa0, 0x2c),
        )?],
    })
}

/// Relative strength index, sub-pane by default
pub fn build_rsi(series: &BarSeries, params: &ResolvedParams) -> Result<IndicatorBody, IndicatorError> {
    let period = window(params, TIME_FRAME)?;
    let samples = rsi(&series.closes(), period);
    Ok(IndicatorBody {
        subpane: matches!(
            params.placement_or(PLACEMENT, ChartPlacement::Subpane)?,
            ChartPlacement::Subpane
        ),
        renderer: RendererKind::Line,
        series: vec![styled_series(
            &format!("RSI {period}"),
            samples,
            params,
            SeriesColor::new(0x94, 0x67, 0xbd),
        )?],
    })
}

/// MACD line plus signal line, sub-pane by default
pub fn build_macd(series: &BarSeries, params: &ResolvedParams) -> Result<IndicatorBody, IndicatorError> {
    let fast = window(params, "Fast Frame")?;
    let slow = window(params, "Slow Frame")?;
    let signal_frame = window(params, "Signal Frame")?;
    if fast >= slow {
        return Err(IndicatorError::InvalidParameterValue {
            name: "Fast Frame".to_string(),
            raw: fast.to_string(),
        });
    }
    let closes = series.closes();
    let fast_ema = ema(&closes, fast);
    let slow_ema = ema(&closes, slow);
    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd, signal_frame);
    let color = params.color_or(COLOR, SeriesColor::new(0xd6, 0x27, 0x28))?;
    let shape = params.shape_or(SHAPE, MarkerShape::Circle)?;
    Ok(IndicatorBody {
        subpane: matches!(
            params.placement_or(PLACEMENT, ChartPlacement::Subpane)?,
            ChartPlacement::Subpane
        ),
        renderer: RendererKind::MultiLine,
        series: vec![
            IndicatorSeries {
                name: format!("MACD {fast}/{slow}"),
                samples: macd,
                color,
                shape,
                stroke: params.stroke_or(STROKE, StrokeStyle::Solid)?,
            },
            IndicatorSeries {
                name: format!("Signal {signal_frame}"),
                samples: signal,
                color,
                shape,
                stroke: StrokeStyle::Dashed,
            },
        ],
    })
}

/// Bollinger bands: middle SMA plus upper/lower bands
pub fn build_bollinger(
    series: &BarSeries,
    params: &ResolvedParams,
) -> Result<IndicatorBody, IndicatorError> {
    let period = window(params, TIME_FRAME)?;
    let width = match params.get("Width") {
        Some(_) => params.double("Width")?,
        None => 2.0,
    };
    let closes = series.closes();
    let middle = sma(&closes, period);
    let deviation = rolling_std(&closes, period);
    let upper: Vec<f64> = middle
        .iter()
        .zip(&deviation)
        .map(|(m, d)| m + width * d)
        .collect();
    let lower: Vec<f64> = middle
        .iter()
        .zip(&deviation)
        .map(|(m, d)| m - width * d)
        .collect();
    let color = params.color_or(COLOR, SeriesColor::new(0x8c, 0x56, 0x4b))?;
    let shape = params.shape_or(SHAPE, MarkerShape::Circle)?;
    let band = |name: String, samples: Vec<f64>, stroke| IndicatorSeries {
        name,
        samples,
        color,
        shape,
        stroke,
    };
    Ok(IndicatorBody {
        subpane: matches!(
            params.placement_or(PLACEMENT, ChartPlacement::Overlay)?,
            ChartPlacement::Subpane
        ),
        renderer: RendererKind::MultiLine,
        series: vec![
            band(format!("BB Middle {period}"), middle, StrokeStyle::Solid),
            band(format!("BB Upper {period}"), upper, StrokeStyle::Dotted),
            band(format!("BB Lower {period}"), lower, StrokeStyle::Dotted),
        ],
    })
}

/// Traded volume as bars, sub-pane by default
pub fn build_volume(
    series: &BarSeries,
    params: &ResolvedParams,
) -> Result<IndicatorBody, IndicatorError> {
    Ok(IndicatorBody {
        subpane: matches!(
            params.placement_or(PLACEMENT, ChartPlacement::Subpane)?,
            ChartPlacement::Subpane
        ),
        renderer: RendererKind::Bars,
        series: vec![styled_series(
            "Volume",
            series.volumes(),
            params,
            SeriesColor::new(0x7f, 0x7f, 0x7f),
        )?],
    })
}

/// Simple moving average, NaN until the window fills
fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = sum / period as f64;
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = sum / period as f64;
    }
    out
}

/// Exponential moving average seeded with the SMA of the first window
fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = seed;
    let mut prev = seed;
    for i in period..values.len() {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

/// Wilder-smoothed RSI
fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }
    let mut gain = 0.0;
    let mut loss = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change >= 0.0 {
            gain += change;
        } else {
            loss -= change;
        }
    }
    let mut avg_gain = gain / period as f64;
    let mut avg_loss = loss / period as f64;
    out[period] = rsi_point(avg_gain, avg_loss);
    for i in (period + 1)..values.len() {
        let change = values[i] - values[i - 1];
        let (g, l) = if change >= 0.0 { (change, 0.0) } else { (0.0, -change) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + g) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + l) / period as f64;
        out[i] = rsi_point(avg_gain, avg_loss);
    }
    out
}

fn rsi_point(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// Rolling population standard deviation over the same window as [`sma`]
fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        let slice = &values[i + 1 - period..=i];
        let mean = slice.iter().sum::<f64>() / period as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        out[i] = var.sqrt();
    }
    out
}
