//! Classical additive seasonal decomposition
//!
//! Splits a series into `trend + seasonal + residual` using a centred moving
//! average for the trend and per-phase averages of the detrended values for
//! the seasonal component. Trend and residual are undefined for the first and
//! last half-period, where the centred window does not fit.

use crate::{ensure_not_constant, MathError, Result};

/// Components of an additive decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    period: usize,
    trend: Vec<Option<f64>>,
    seasonal: Vec<f64>,
    residual: Vec<Option<f64>>,
}

impl Decomposition {
    /// Seasonal period used for the decomposition
    pub fn period(&self) -> usize {
        self.period
    }

    /// Trend component, `None` at the edges
    pub fn trend(&self) -> &[Option<f64>] {
        &self.trend
    }

    /// Seasonal component, one value per observation
    pub fn seasonal(&self) -> &[f64] {
        &self.seasonal
    }

    /// Residual component, `None` where the trend is undefined
    pub fn residual(&self) -> &[Option<f64>] {
        &self.residual
    }

    /// Seasonal values of the most recent complete cycle
    pub fn last_cycle(&self) -> &[f64] {
        &self.seasonal[self.seasonal.len() - self.period..]
    }

    /// `trend + seasonal` wherever the trend is defined
    pub fn fitted(&self) -> Vec<Option<f64>> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .map(|(trend, seasonal)| trend.map(|t| t + seasonal))
            .collect()
    }
}

/// Decompose `values` with a fixed seasonal `period`.
///
/// Needs at least two full cycles and some variation in the data.
pub fn seasonal_decompose(values: &[f64], period: usize) -> Result<Decomposition> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Seasonal period must be positive".to_string(),
        ));
    }
    if values.len() < 2 * period {
        return Err(MathError::InsufficientData(format!(
            "Seasonal decomposition with period {} needs at least {} observations, got {}",
            period,
            2 * period,
            values.len()
        )));
    }
    ensure_not_constant(values, "Seasonal decomposition")?;

    let trend = centered_moving_average(values, period);

    let detrended: Vec<Option<f64>> = values
        .iter()
        .zip(&trend)
        .map(|(value, trend)| trend.map(|t| value - t))
        .collect();

    // Average detrended value per phase
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, value) in detrended.iter().enumerate() {
        if let Some(v) = value {
            sums[i % period] += v;
            counts[i % period] += 1;
        }
    }
    let mut pattern: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();

    // Seasonal effects sum to zero over a cycle
    let offset = pattern.iter().sum::<f64>() / period as f64;
    pattern.iter_mut().for_each(|s| *s -= offset);

    let seasonal: Vec<f64> = (0..values.len()).map(|i| pattern[i % period]).collect();
    let residual = detrended
        .iter()
        .zip(&seasonal)
        .map(|(detrended, seasonal)| detrended.map(|d| d - seasonal))
        .collect();

    Ok(Decomposition {
        period,
        trend,
        seasonal,
        residual,
    })
}

/// Centred moving average; even periods use the `2 x period` weighting.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 1 {
        return values.iter().copied().map(Some).collect();
    }

    let n = values.len();
    let half = period / 2;
    let mut trend = vec![None; n];

    for (t, slot) in trend.iter_mut().enumerate().take(n - half).skip(half) {
        let value = if period % 2 == 1 {
            values[t - half..=t + half].iter().sum::<f64>() / period as f64
        } else {
            let inner: f64 = values[t + 1 - half..t + half].iter().sum();
            (0.5 * values[t - half] + inner + 0.5 * values[t + half]) / period as f64
        };
        *slot = Some(value);
    }

    trend
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn seasonal_series() -> Vec<f64> {
        // Linear trend plus a repeating [+5, -5, +10, -10] pattern
        let pattern = [5.0, -5.0, 10.0, -10.0];
        (0..16)
            .map(|i| 100.0 + 2.0 * i as f64 + pattern[i % 4])
            .collect()
    }

    #[test]
    fn test_recovers_seasonal_pattern() {
        let decomposition = seasonal_decompose(&seasonal_series(), 4).unwrap();

        let cycle = decomposition.last_cycle();
        assert_eq!(cycle.len(), 4);
        assert_abs_diff_eq!(cycle[0], 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cycle[1], -5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cycle[2], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cycle[3], -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cycle.iter().sum::<f64>(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_trend_edges_undefined() {
        let decomposition = seasonal_decompose(&seasonal_series(), 4).unwrap();
        let trend = decomposition.trend();

        assert!(trend[0].is_none() && trend[1].is_none());
        assert!(trend[14].is_none() && trend[15].is_none());
        // Centred 2x4 average of a linear trend is the trend itself
        assert_abs_diff_eq!(trend[2].unwrap(), 104.0, epsilon = 1e-9);
        assert!(decomposition.residual()[5].unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_odd_period() {
        let values: Vec<f64> = (0..9).map(|i| [1.0, 2.0, 6.0][i % 3] + i as f64).collect();
        let decomposition = seasonal_decompose(&values, 3).unwrap();
        assert_eq!(decomposition.fitted().iter().filter(|f| f.is_some()).count(), 7);
    }

    #[test]
    fn test_short_series_fails() {
        let err = seasonal_decompose(&[1.0, 2.0, 3.0, 4.0, 5.0], 4).unwrap_err();
        assert!(matches!(err, MathError::InsufficientData(_)));
    }

    #[test]
    fn test_constant_series_fails() {
        assert!(seasonal_decompose(&[3.0; 12], 3).is_err());
        assert!(seasonal_decompose(&[1.0, 2.0], 0).is_err());
    }
}
