use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;
use sales_forecast::metrics::{MetricsCalculator, MetricsPolicy};
use sales_forecast::models::arima::ArimaModel;
use sales_forecast::models::exponential_smoothing::ExponentialSmoothing;
use sales_forecast::models::linear_regression::LinearTrend;
use sales_forecast::models::moving_average::MovingAverage;
use sales_forecast::models::seasonal::SeasonalDecomposition;
use sales_forecast::models::{ForecastModel, TrainedForecastModel};
use sales_forecast::preprocessing::OutlierFilter;
use serde_json::json;

/// Trending weekly-seasonal series with gaussian noise
fn seasonal_series(len: usize, period: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 15.0).unwrap();
    let pattern = [120.0, -40.0, -80.0, 10.0, 60.0, -30.0, -40.0];

    (0..len)
        .map(|t| 1500.0 + 4.0 * t as f64 + pattern[t % period % pattern.len()] + noise.sample(&mut rng))
        .collect()
}

/// Random walk with drift
fn trending_series(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 25.0).unwrap();
    let mut level = 2000.0;

    (0..len)
        .map(|_| {
            level += 12.0 + noise.sample(&mut rng);
            level
        })
        .collect()
}

#[test]
fn test_moving_average_recursion() {
    let model = MovingAverage::new(3, 0.3).unwrap();
    let trained = model.train(&[10.0, 20.0, 30.0]).unwrap();

    let forecast = trained.forecast(2).unwrap();

    // 0.3 * mean(10, 20, 30) + 0.7 * 30
    assert_abs_diff_eq!(forecast[0], 27.0, epsilon = 1e-9);
    // 0.3 * mean(20, 30, 27) + 0.7 * 27
    assert_abs_diff_eq!(forecast[1], 26.6, epsilon = 1e-9);
}

#[test]
fn test_moving_average_window_larger_than_series() {
    let model = MovingAverage::new(10, 0.5).unwrap();
    let trained = model.train(&[100.0, 200.0]).unwrap();

    let forecast = trained.forecast(1).unwrap();

    // Window shrinks to the two available values: 0.5 * 150 + 0.5 * 200
    assert_abs_diff_eq!(forecast[0], 175.0, epsilon = 1e-9);
}

#[test]
fn test_moving_average_predictions_stay_within_working_range() {
    let values = trending_series(30, 7);
    let model = MovingAverage::new(4, 0.3).unwrap();
    let trained = model.train(&values).unwrap();
    let forecast = trained.forecast(12).unwrap();

    let mut working = values.clone();
    for prediction in forecast {
        let min = working.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = working.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(prediction >= min - 1e-9 && prediction <= max + 1e-9);
        working.push(prediction);
    }
}

#[test]
fn test_moving_average_outlier_filter() {
    let values = [10.0, 12.0, 11.0, 10.0, 13.0, 1000.0];
    let model = MovingAverage::new(3, 0.3)
        .unwrap()
        .with_outlier_filter(Some(OutlierFilter::default()));

    let trained = model.train(&values).unwrap();
    let forecast = trained.forecast(1).unwrap();

    // Forecast starts from [.., 10, 13]: 0.3 * mean(11, 10, 13) + 0.7 * 13
    assert_abs_diff_eq!(forecast[0], 0.3 * (34.0 / 3.0) + 0.7 * 13.0, epsilon = 1e-9);
    assert_eq!(trained.model_info().get("outliers_removed"), Some(&json!(1)));
}

#[test]
fn test_moving_average_metrics_use_unfiltered_history() {
    let values = [1200.0, 1300.0, 1500.0, 1600.0, 1700.0];
    let model = MovingAverage::new(3, 0.3)
        .unwrap()
        .with_metrics(MetricsCalculator::new(MetricsPolicy::default()));

    let trained = model.train(&values).unwrap();
    let metrics = trained.evaluate(&[1550.0, 1650.0, 1750.0]);

    assert_abs_diff_eq!(metrics.mae, 50.0, epsilon = 1e-9);
    assert!(metrics.mape.is_some());
    assert!(metrics.rmse.is_some());
}

#[rstest]
#[case(0, 0.3)]
#[case(3, -0.1)]
#[case(3, 1.5)]
fn test_moving_average_invalid_parameters(#[case] window: usize, #[case] alpha: f64) {
    assert!(MovingAverage::new(window, alpha).is_err());
}

#[test]
fn test_moving_average_empty_input() {
    let model = MovingAverage::new(3, 0.3).unwrap();
    assert!(model.train(&[]).is_err());
}

#[test]
fn test_linear_regression_perfect_line() {
    let output = LinearTrend::new()
        .forecast(&[10.0, 20.0, 30.0, 40.0], 3)
        .unwrap();

    assert_abs_diff_eq!(output.predictions[0], 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(output.predictions[1], 60.0, epsilon = 1e-9);
    assert_abs_diff_eq!(output.predictions[2], 70.0, epsilon = 1e-9);

    assert_abs_diff_eq!(output.metrics.mae, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(output.metrics.r2.unwrap(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(output.metrics.rmse.unwrap(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(output.metrics.accuracy, 100.0, epsilon = 1e-9);

    assert_eq!(output.model_info.model_type, "linear_regression");
    assert_abs_diff_eq!(
        output.model_info.get("slope").and_then(|v| v.as_f64()).unwrap(),
        10.0,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        output.model_info.get("intercept").and_then(|v| v.as_f64()).unwrap(),
        10.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_linear_regression_single_point_fails() {
    assert!(LinearTrend::new().forecast(&[10.0], 2).is_err());
}

#[test]
fn test_seasonal_decomposition_forecast() {
    let period = 4;
    let values: Vec<f64> = (0..12)
        .map(|t| 100.0 + [10.0, -5.0, 0.0, -5.0][t % period] + t as f64)
        .collect();

    let model = SeasonalDecomposition::new(period).unwrap();
    let trained = model.train(&values).unwrap();
    let forecast = trained.forecast(6).unwrap();

    let base = values[8..].iter().sum::<f64>() / 4.0;
    let info = trained.model_info();
    let pattern: Vec<f64> = info
        .get("seasonal_pattern")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();

    assert_eq!(pattern.len(), period);
    for (i, value) in forecast.iter().enumerate() {
        assert_abs_diff_eq!(*value, base + pattern[i % period], epsilon = 1e-9);
    }
    // Peak phase stays the peak
    assert!(forecast[0] > forecast[1]);
    assert_eq!(info.get("model"), Some(&json!("additive")));
    assert_eq!(info.get("seasonality"), Some(&json!(4)));
}

#[test]
fn test_seasonal_decomposition_needs_two_cycles() {
    let model = SeasonalDecomposition::new(12).unwrap();
    assert!(model.forecast(&trending_series(20, 3), 3).is_err());
}

#[test]
fn test_seasonal_decomposition_rejects_constant_series() {
    let model = SeasonalDecomposition::new(2).unwrap();
    assert!(model.forecast(&[5.0; 8], 3).is_err());
}

#[test]
fn test_exponential_smoothing_seasonal_when_long_enough() {
    let values = seasonal_series(42, 7, 11);
    let output = ExponentialSmoothing::new(7).unwrap().forecast(&values, 7).unwrap();

    assert_eq!(output.predictions.len(), 7);
    assert_eq!(output.model_info.model_type, "exponential_smoothing");
    assert_eq!(output.model_info.get("seasonal"), Some(&json!(true)));
    assert_eq!(output.model_info.get("seasonal_periods"), Some(&json!(7)));
    assert!(output.model_info.get("smoothing_seasonal").is_some());
    assert!(output.metrics.mae > 0.0);
    assert!(output.metrics.accuracy > 80.0);
}

#[test]
fn test_exponential_smoothing_trend_only_for_short_series() {
    // 14 points is not longer than two weekly cycles
    let values = trending_series(14, 5);
    let output = ExponentialSmoothing::new(7).unwrap().forecast(&values, 3).unwrap();

    assert_eq!(output.predictions.len(), 3);
    assert_eq!(output.model_info.get("seasonal"), Some(&json!(false)));
    assert!(output.model_info.get("smoothing_seasonal").is_none());
}

#[test]
fn test_exponential_smoothing_rejects_constant_series() {
    let model = ExponentialSmoothing::new(12).unwrap();
    assert!(model.forecast(&[100.0; 10], 3).is_err());
}

#[test]
fn test_arima_forecast() {
    let values = trending_series(40, 21);
    let output = ArimaModel::default().forecast(&values, 5).unwrap();

    assert_eq!(output.predictions.len(), 5);
    assert!(output.predictions.iter().all(|v| v.is_finite()));
    assert_eq!(output.model_info.model_type, "arima");
    assert_eq!(output.model_info.get("order"), Some(&json!([1, 1, 1])));
    assert!(output
        .model_info
        .get("aic")
        .and_then(|v| v.as_f64())
        .is_some_and(f64::is_finite));
    assert!(output.metrics.accuracy > 90.0);
}

#[test]
fn test_arima_fails_on_degenerate_input() {
    assert!(ArimaModel::default().forecast(&[500.0; 12], 3).is_err());
    assert!(ArimaModel::default().forecast(&[1.0, 2.0, 4.0], 3).is_err());
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(13)]
fn test_every_strategy_returns_requested_periods(#[case] periods: usize) {
    let values = seasonal_series(36, 7, 42);

    let outputs = vec![
        MovingAverage::new(3, 0.3).unwrap().forecast(&values, periods).unwrap(),
        LinearTrend::new().forecast(&values, periods).unwrap(),
        SeasonalDecomposition::new(7).unwrap().forecast(&values, periods).unwrap(),
        ExponentialSmoothing::new(7).unwrap().forecast(&values, periods).unwrap(),
        ArimaModel::default().forecast(&values, periods).unwrap(),
    ];

    for output in outputs {
        assert_eq!(output.predictions.len(), periods);
        assert_eq!(output.model_info.get("periods"), Some(&json!(periods)));
    }
}
