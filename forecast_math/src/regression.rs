//! Ordinary least squares trend fitting
//!
//! Fits `value = slope * index + intercept` over a sequence whose x values
//! are the positions `0..n`.

use crate::{MathError, Result};
use serde::Serialize;

/// Linear trend fitted by ordinary least squares
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    observations: usize,
}

impl LinearRegression {
    /// Fit the regression line over `values` indexed `0..n`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Need at least 2 points for linear regression".to_string(),
            ));
        }

        let n = values.len() as f64;

        // Calculate means
        let x_mean = (0..values.len()).map(|i| i as f64).sum::<f64>() / n;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        // Coefficient of determination
        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let y_pred = slope * i as f64 + intercept;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        // A flat series is explained perfectly by a flat line
        let r_squared = if ss_total.abs() < 1e-10 {
            if ss_residual.abs() < 1e-10 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            observations: values.len(),
        })
    }

    /// Value of the fitted line at position `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// In-sample values of the line at positions `0..n`
    pub fn fitted_values(&self) -> Vec<f64> {
        (0..self.observations)
            .map(|i| self.predict(i as f64))
            .collect()
    }

    /// Extrapolate the line over positions `n..n + periods`
    pub fn forecast(&self, periods: usize) -> Vec<f64> {
        (self.observations..self.observations + periods)
            .map(|i| self.predict(i as f64))
            .collect()
    }

    /// Get the slope (trend per period)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Get the R-squared value (coefficient of determination)
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Number of points the line was fitted on
    pub fn observations(&self) -> usize {
        self.observations
    }
}
