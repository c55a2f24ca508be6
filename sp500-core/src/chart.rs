//! Chart models: one two-panel figure per company.
//!
//! Top panel is the closing price, bottom panel the traded volume, both
//! plotted against calendar days since the first bar. The model carries
//! everything a renderer needs (points, bounds, date ticks) so the UI layer
//! only draws.

use chrono::NaiveDate;

use crate::data::{Company, GroupedSeries, PriceSeries};
use crate::selection::ChartRequest;

pub const CLOSE_AXIS_LABEL: &str = "Closing Price of Stock";
pub const VOLUME_AXIS_LABEL: &str = "Volume of Stock";
pub const DATE_AXIS_LABEL: &str = "Date";

/// One panel of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    pub y_label: &'static str,
    /// (days since first bar, value); non-finite values are dropped.
    pub points: Vec<(f64, f64)>,
    pub y_bounds: [f64; 2],
}

impl PanelData {
    fn new(y_label: &'static str, points: Vec<(f64, f64)>) -> Self {
        let y_bounds = padded_bounds(points.iter().map(|p| p.1));
        Self {
            y_label,
            points,
            y_bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A date tick on the shared x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTick {
    pub x: f64,
    pub date: NaiveDate,
}

impl DateTick {
    pub fn label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Two-panel price/volume figure for one company.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyChart {
    pub company: Company,
    pub title: String,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub x_bounds: [f64; 2],
    pub close: PanelData,
    pub volume: PanelData,
}

impl CompanyChart {
    pub fn from_series(company: Company, series: Option<&PriceSeries>) -> Self {
        let title = format!("{} - {}", company.symbol, company.security);
        let bars = series.map(|s| s.bars.as_slice()).unwrap_or(&[]);
        let first_date = bars.first().map(|b| b.date);
        let last_date = bars.last().map(|b| b.date);

        let x_of = |d: NaiveDate| match first_date {
            Some(first) => (d - first).num_days() as f64,
            None => 0.0,
        };

        let close = bars
            .iter()
            .filter(|b| b.close.is_finite())
            .map(|b| (x_of(b.date), b.close))
            .collect();
        let volume = bars
            .iter()
            .map(|b| (x_of(b.date), b.volume as f64))
            .collect();

        let x_max = last_date.map(x_of).unwrap_or(0.0);

        Self {
            company,
            title,
            first_date,
            last_date,
            x_bounds: [0.0, x_max.max(1.0)],
            close: PanelData::new(CLOSE_AXIS_LABEL, close),
            volume: PanelData::new(VOLUME_AXIS_LABEL, volume),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.close.is_empty() || !self.volume.is_empty()
    }

    /// Up to `max_ticks` evenly spaced date ticks, always including both ends.
    pub fn date_ticks(&self, max_ticks: usize) -> Vec<DateTick> {
        let (Some(first), Some(last)) = (self.first_date, self.last_date) else {
            return Vec::new();
        };
        let span = (last - first).num_days();
        if max_ticks == 0 {
            return Vec::new();
        }
        if span == 0 || max_ticks == 1 {
            return vec![DateTick { x: 0.0, date: first }];
        }

        let steps = (max_ticks - 1).min(span as usize) as i64;
        (0..=steps)
            .map(|i| {
                let offset = span * i / steps;
                DateTick {
                    x: offset as f64,
                    date: first + chrono::Duration::days(offset),
                }
            })
            .collect()
    }
}

/// One chart per target company, in target order. Companions are skipped
/// because they are not targets.
pub fn build_chart_set(request: &ChartRequest, grouped: &GroupedSeries) -> Vec<CompanyChart> {
    request
        .targets
        .iter()
        .map(|company| CompanyChart::from_series(company.clone(), grouped.get(&company.symbol)))
        .collect()
}

/// Value range with 5% headroom. The area fill runs down to zero, so
/// non-negative series keep zero as the lower bound.
fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min).abs() * 0.05).max(max.abs() * 0.01).max(f64::EPSILON);
    let lo = if min >= 0.0 { 0.0 } else { min - pad };
    [lo, max + pad]
}
