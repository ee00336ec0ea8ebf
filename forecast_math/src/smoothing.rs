//! Holt and Holt-Winters exponential smoothing
//!
//! Both models use additive trend; Holt-Winters adds an additive seasonal
//! component. Smoothing parameters are chosen by minimising the in-sample
//! one-step-ahead squared error.
//!
//! ```text
//! Level:    l_t = α (y_t - s_{t-m}) + (1 - α)(l_{t-1} + b_{t-1})
//! Trend:    b_t = β (l_t - l_{t-1}) + (1 - β) b_{t-1}
//! Seasonal: s_t = γ (y_t - l_t) + (1 - γ) s_{t-m}
//! Forecast: ŷ_{t+h} = l_t + h b_t + s_{t+h-m}
//! ```

use crate::optimization::NelderMead;
use crate::{ensure_not_constant, MathError, Result};

const PARAM_BOUNDS: (f64, f64) = (0.0001, 0.9999);

fn check_param(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(MathError::InvalidInput(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}

/// Holt's linear (double) exponential smoothing
#[derive(Debug, Clone)]
pub struct HoltLinear {
    alpha: f64,
    beta: f64,
    level: f64,
    trend: f64,
    fitted: Vec<f64>,
    sse: f64,
}

impl HoltLinear {
    /// Fit with smoothing parameters chosen by minimising the SSE
    pub fn fit(values: &[f64]) -> Result<Self> {
        Self::validate(values)?;

        let bounds = [PARAM_BOUNDS, PARAM_BOUNDS];
        let best = NelderMead::default().minimize(
            |params| Self::run(values, params[0], params[1]).sse,
            &[0.3, 0.1],
            &bounds,
        );
        if !best.value.is_finite() || best.value == f64::MAX {
            return Err(MathError::CalculationError(
                "Holt smoothing parameters did not converge".to_string(),
            ));
        }

        Self::with_params(values, best.point[0], best.point[1])
    }

    /// Fit with fixed smoothing parameters
    pub fn with_params(values: &[f64], alpha: f64, beta: f64) -> Result<Self> {
        Self::validate(values)?;
        check_param("Alpha", alpha)?;
        check_param("Beta", beta)?;

        Ok(Self::run(values, alpha, beta))
    }

    fn validate(values: &[f64]) -> Result<()> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Holt smoothing needs at least 2 observations".to_string(),
            ));
        }
        ensure_not_constant(values, "Holt smoothing")
    }

    fn run(values: &[f64], alpha: f64, beta: f64) -> Self {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut fitted = Vec::with_capacity(values.len());
        let mut sse = 0.0;

        // First observation seeds the state
        fitted.push(level);

        for &y in &values[1..] {
            let forecast = level + trend;
            fitted.push(forecast);
            sse += (y - forecast).powi(2);

            let prev_level = level;
            level = alpha * y + (1.0 - alpha) * (prev_level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
        }

        Self {
            alpha,
            beta,
            level,
            trend,
            fitted,
            sse,
        }
    }

    /// Forecast `horizon` steps ahead
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|h| self.level + h as f64 * self.trend)
            .collect()
    }

    /// One-step-ahead in-sample predictions
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// Sum of squared one-step-ahead errors
    pub fn sse(&self) -> f64 {
        self.sse
    }
}

/// Additive Holt-Winters (triple exponential smoothing)
#[derive(Debug, Clone)]
pub struct HoltWinters {
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
    observations: usize,
}

impl HoltWinters {
    /// Fit with smoothing parameters chosen by minimising the SSE
    pub fn fit(values: &[f64], period: usize) -> Result<Self> {
        Self::validate(values, period)?;

        let bounds = [PARAM_BOUNDS, PARAM_BOUNDS, PARAM_BOUNDS];
        let best = NelderMead::default().minimize(
            |params| Self::run(values, period, params[0], params[1], params[2]).sse,
            &[0.3, 0.1, 0.1],
            &bounds,
        );
        if !best.value.is_finite() || best.value == f64::MAX {
            return Err(MathError::CalculationError(
                "Holt-Winters smoothing parameters did not converge".to_string(),
            ));
        }

        Self::with_params(values, period, best.point[0], best.point[1], best.point[2])
    }

    /// Fit with fixed smoothing parameters
    pub fn with_params(
        values: &[f64],
        period: usize,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self> {
        Self::validate(values, period)?;
        check_param("Alpha", alpha)?;
        check_param("Beta", beta)?;
        check_param("Gamma", gamma)?;

        Ok(Self::run(values, period, alpha, beta, gamma))
    }

    fn validate(values: &[f64], period: usize) -> Result<()> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Seasonal period must be at least 2".to_string(),
            ));
        }
        if values.len() < 2 * period {
            return Err(MathError::InsufficientData(format!(
                "Holt-Winters with period {} needs at least {} observations, got {}",
                period,
                2 * period,
                values.len()
            )));
        }
        ensure_not_constant(values, "Holt-Winters")
    }

    /// Initial level, trend and seasonal indices from the first two cycles
    fn initial_state(values: &[f64], period: usize) -> (f64, f64, Vec<f64>) {
        let first = &values[..period];
        let level = first.iter().sum::<f64>() / period as f64;

        let trend = (0..period)
            .map(|i| (values[period + i] - values[i]) / period as f64)
            .sum::<f64>()
            / period as f64;

        let mut seasonals: Vec<f64> = first.iter().map(|y| y - level).collect();
        let offset = seasonals.iter().sum::<f64>() / period as f64;
        seasonals.iter_mut().for_each(|s| *s -= offset);

        (level, trend, seasonals)
    }

    fn run(values: &[f64], period: usize, alpha: f64, beta: f64, gamma: f64) -> Self {
        let (mut level, mut trend, mut seasonals) = Self::initial_state(values, period);
        let mut fitted = Vec::with_capacity(values.len());
        let mut sse = 0.0;

        // The first cycle is consumed by initialisation
        fitted.extend_from_slice(&values[..period]);

        for (t, &y) in values.iter().enumerate().skip(period) {
            let idx = t % period;
            let season = seasonals[idx];

            let forecast = level + trend + season;
            fitted.push(forecast);
            sse += (y - forecast).powi(2);

            let prev_level = level;
            level = alpha * (y - season) + (1.0 - alpha) * (prev_level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
            seasonals[idx] = gamma * (y - level) + (1.0 - gamma) * season;
        }

        Self {
            alpha,
            beta,
            gamma,
            period,
            level,
            trend,
            seasonals,
            fitted,
            sse,
            observations: values.len(),
        }
    }

    /// Forecast `horizon` steps ahead
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|h| {
                let season = self.seasonals[(self.observations + h - 1) % self.period];
                self.level + h as f64 * self.trend + season
            })
            .collect()
    }

    /// One-step-ahead in-sample predictions (the first cycle echoes the data)
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// Current seasonal indices, indexed by `t % period`
    pub fn seasonals(&self) -> &[f64] {
        &self.seasonals
    }

    /// Sum of squared one-step-ahead errors after the first cycle
    pub fn sse(&self) -> f64 {
        self.sse
    }
}
