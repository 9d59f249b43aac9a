use crate::coins::SortKey;

use super::error::ChartError;

const MARKET_CAP_RADIUS_RANGE: (f32, f32) = (10.0, 90.0);
const PERCENT_CHANGE_RADIUS_RANGE: (f32, f32) = (8.0, 70.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Log,
}

/// Maps a sort metric value onto a pixel radius.
///
/// Market cap uses a logarithmic mapping because the values span many orders
/// of magnitude and are always positive. Percent change can be zero or
/// negative, so it maps linearly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    kind: ScaleKind,
    domain: (f64, f64),
    range: (f32, f32),
}

impl RadiusScale {
    pub fn for_values(values: &[f64], sort_key: SortKey) -> Result<Self, ChartError> {
        if values.is_empty() {
            return Err(ChartError::InvalidDataset(
                "dataset has no values to scale".to_owned(),
            ));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ChartError::InvalidDataset(format!(
                    "{} at index {index} is not a number",
                    sort_key.attribute()
                )));
            }
            min = min.min(value);
            max = max.max(value);
        }

        let (kind, range) = match sort_key {
            SortKey::MarketCap => (ScaleKind::Log, MARKET_CAP_RADIUS_RANGE),
            SortKey::PercentChange24h => (ScaleKind::Linear, PERCENT_CHANGE_RADIUS_RANGE),
        };

        if kind == ScaleKind::Log && min <= 0.0 {
            return Err(ChartError::InvalidDataset(format!(
                "{} must be positive for a log scale, found {min}",
                sort_key.attribute()
            )));
        }

        Ok(Self {
            kind,
            domain: (min, max),
            range,
        })
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    fn normalize(&self, value: f64) -> f64 {
        let (min, max) = self.domain;
        let (value, min, max) = match self.kind {
            ScaleKind::Linear => (value, min, max),
            ScaleKind::Log => (value.ln(), min.ln(), max.ln()),
        };

        let span = max - min;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }

        ((value - min) / span).clamp(0.0, 1.0)
    }

    pub fn radius(&self, value: f64) -> f32 {
        let (low, high) = self.range;
        let t = self.normalize(value);
        if t.is_nan() {
            return low;
        }
        low + ((high - low) * t as f32)
    }
}
