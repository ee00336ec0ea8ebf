//! ARIMA(p, d, q) fitted by conditional sum of squares
//!
//! The series is differenced `d` times, an ARMA(p, q) model is fitted to the
//! differenced values by minimising the conditional sum of squared one-step
//! errors, and forecasts are integrated back to the original scale. A
//! constant is only estimated when `d == 0`.

use crate::optimization::NelderMead;
use crate::{ensure_not_constant, MathError, Result};
use serde::Serialize;
use std::f64::consts::PI;

/// Model order `(p, d, q)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArimaOrder {
    /// Autoregressive terms
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving-average terms
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// As `[p, d, q]`
    pub fn as_array(&self) -> [usize; 3] {
        [self.p, self.d, self.q]
    }
}

/// Fitted ARIMA model
#[derive(Debug, Clone)]
pub struct Arima {
    order: ArimaOrder,
    ar: Vec<f64>,
    ma: Vec<f64>,
    constant: Option<f64>,
    original: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    fitted: Vec<f64>,
    sigma2: f64,
    aic: f64,
}

impl Arima {
    /// Fit an ARIMA model of the given order
    pub fn fit(values: &[f64], order: ArimaOrder) -> Result<Self> {
        let ArimaOrder { p, d, q } = order;
        let start = p.max(q);
        let min_len = d + start + 2;

        if values.len() < min_len {
            return Err(MathError::InsufficientData(format!(
                "ARIMA({},{},{}) needs at least {} observations, got {}",
                p,
                d,
                q,
                min_len,
                values.len()
            )));
        }
        ensure_not_constant(values, "ARIMA")?;

        let differenced = difference(values, d);
        let with_constant = d == 0;
        let diff_mean = differenced.iter().sum::<f64>() / differenced.len() as f64;

        // Parameter vector: [ar.., ma.., constant?]
        let mut initial = Vec::with_capacity(p + q + 1);
        let mut bounds = Vec::with_capacity(p + q + 1);
        for i in 0..p + q {
            let lag = if i < p { i } else { i - p };
            initial.push(0.1 / (lag + 1) as f64);
            bounds.push((-0.99, 0.99));
        }
        if with_constant {
            initial.push(diff_mean);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }

        let split = |params: &[f64]| -> (Vec<f64>, Vec<f64>, f64) {
            let constant = if with_constant { params[p + q] } else { 0.0 };
            (params[..p].to_vec(), params[p..p + q].to_vec(), constant)
        };

        let (ar, ma, constant) = if initial.is_empty() {
            (Vec::new(), Vec::new(), 0.0)
        } else {
            let best = NelderMead::default().minimize(
                |params| {
                    let (ar, ma, c) = split(params);
                    conditional_residuals(&differenced, &ar, &ma, c, start).1
                },
                &initial,
                &bounds,
            );
            split(&best.point)
        };

        let (residuals, css) = conditional_residuals(&differenced, &ar, &ma, constant, start);
        let n_eff = (differenced.len() - start) as f64;
        let sigma2 = css / n_eff;

        if !sigma2.is_finite() {
            return Err(MathError::CalculationError(
                "ARIMA residual variance is not finite".to_string(),
            ));
        }
        if sigma2 <= 1e-12 {
            return Err(MathError::CalculationError(
                "ARIMA residual variance vanished; likelihood is undefined".to_string(),
            ));
        }

        let params = (p + q + 1 + usize::from(with_constant)) as f64;
        let log_likelihood = -0.5 * n_eff * (1.0 + (2.0 * PI).ln() + sigma2.ln());
        let aic = -2.0 * log_likelihood + 2.0 * params;

        // One-step level error equals the error on the differenced scale
        let fitted = (start..differenced.len())
            .map(|t| values[t + d] - residuals[t])
            .collect();

        Ok(Self {
            order,
            ar,
            ma,
            constant: with_constant.then_some(constant),
            original: values.to_vec(),
            differenced,
            residuals,
            fitted,
            sigma2,
            aic,
        })
    }

    /// Forecast `horizon` steps ahead on the original scale
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let c = self.constant.unwrap_or(0.0);
        let mut extended = self.differenced.clone();
        let mut errors = self.residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = c;
            for (i, phi) in self.ar.iter().enumerate() {
                pred += phi * (extended[t - 1 - i] - c);
            }
            for (i, theta) in self.ma.iter().enumerate() {
                pred += theta * errors[t - 1 - i];
            }
            extended.push(pred);
            // Future shocks have zero expectation
            errors.push(0.0);
        }

        integrate(&extended[self.differenced.len()..], &self.original, self.order.d)
    }

    /// In-sample one-step predictions on the original scale.
    ///
    /// Aligned with [`Arima::aligned_actuals`]; the first `d + max(p, q)`
    /// observations have no prediction.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Observations that [`Arima::fitted_values`] line up with
    pub fn aligned_actuals(&self) -> &[f64] {
        &self.original[self.original.len() - self.fitted.len()..]
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Estimated constant, only present when `d == 0`
    pub fn constant(&self) -> Option<f64> {
        self.constant
    }

    /// Residual variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Akaike information criterion (Gaussian likelihood of the CSS residuals)
    pub fn aic(&self) -> f64 {
        self.aic
    }
}

/// Residuals and their sum of squares, with pre-sample errors taken as zero
fn conditional_residuals(
    series: &[f64],
    ar: &[f64],
    ma: &[f64],
    constant: f64,
    start: usize,
) -> (Vec<f64>, f64) {
    let mut residuals = vec![0.0; series.len()];
    let mut css = 0.0;

    for t in start..series.len() {
        let mut pred = constant;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (series[t - 1 - i] - constant);
        }
        for (i, theta) in ma.iter().enumerate() {
            pred += theta * residuals[t - 1 - i];
        }
        let error = series[t] - pred;
        residuals[t] = error;
        css += error * error;
    }

    (residuals, css)
}

/// Apply `d` rounds of first differencing
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d` rounds of differencing for values that follow `original`
pub fn integrate(forecast: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    // Last value of the series differenced 0..d times
    let mut anchors = Vec::with_capacity(d);
    let mut current = original.to_vec();
    for _ in 0..d {
        anchors.push(current.last().copied().unwrap_or(0.0));
        current = difference(&current, 1);
    }

    let mut result = forecast.to_vec();
    for anchor in anchors.into_iter().rev() {
        let mut acc = anchor;
        for value in result.iter_mut() {
            acc += *value;
            *value = acc;
        }
    }
    result
}
