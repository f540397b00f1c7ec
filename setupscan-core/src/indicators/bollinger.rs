//! Bollinger Bands and band-width.
//!
//! - Middle: SMA(close, period)
//! - Upper/Lower: middle +/- mult * stddev(close, period), population stddev
//! - Width: (upper - lower) / middle, NaN when middle is zero or NaN
//!
//! Lookback: period - 1.

use crate::domain::Bar;

/// All three bands computed in one pass.
#[derive(Debug, Clone, Default)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerSeries {
    /// Normalised band-width per bar.
    pub fn width(&self) -> Vec<f64> {
        self.upper
            .iter()
            .zip(&self.middle)
            .zip(&self.lower)
            .map(|((&u, &m), &l)| band_width(u, m, l))
            .collect()
    }
}

/// (upper - lower) / middle, NaN on a zero or non-finite middle band.
pub fn band_width(upper: f64, middle: f64, lower: f64) -> f64 {
    if !middle.is_finite() || middle == 0.0 {
        return f64::NAN;
    }
    (upper - lower) / middle
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        assert!(
            multiplier > 0.0 && multiplier.is_finite(),
            "Bollinger multiplier must be positive and finite"
        );
        Self { period, multiplier }
    }

    /// Leading bars with undefined bands.
    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    pub fn bands(&self, bars: &[Bar]) -> BollingerSeries {
        let n = bars.len();
        let mut series = BollingerSeries {
            upper: vec![f64::NAN; n],
            middle: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
        };
        if n < self.period {
            return series;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            if window.iter().any(|b| b.close.is_nan()) {
                continue;
            }

            let mean = window.iter().map(|b| b.close).sum::<f64>() / self.period as f64;
            let variance = window
                .iter()
                .map(|b| {
                    let diff = b.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.period as f64;
            let offset = self.multiplier * variance.sqrt();

            series.middle[i] = mean;
            series.upper[i] = mean + offset;
            series.lower[i] = mean - offset;
        }

        series
    }
}
