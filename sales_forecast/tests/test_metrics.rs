use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use sales_forecast::formatter::{future_dates, ConfidenceBand, ResponseFormatter};
use sales_forecast::metrics::{Metrics, MetricsCalculator, MetricsPolicy};
use sales_forecast::Frequency;
use chrono::NaiveDate;

fn recent() -> MetricsCalculator {
    MetricsCalculator::new(MetricsPolicy::default())
}

#[test]
fn test_recent_window_metrics() {
    let actual = [900.0, 1500.0, 1600.0, 1700.0];
    let predicted = [1550.0, 1650.0, 1750.0, 1800.0];

    let metrics = recent().calculate(&actual, &predicted);

    assert_abs_diff_eq!(metrics.mae, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.rmse.unwrap(), 50.0, epsilon = 1e-9);

    let expected_mape = (50.0 / 1500.0 + 50.0 / 1600.0 + 50.0 / 1700.0) / 3.0 * 100.0;
    assert_abs_diff_eq!(metrics.mape.unwrap(), expected_mape, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.accuracy, 100.0 - expected_mape, epsilon = 1e-9);
    assert!(metrics.accuracy >= 0.0 && metrics.accuracy.is_finite());
}

#[test]
fn test_recent_window_ignores_immaterial_actuals() {
    // Only the 5000 actual is above the floor
    let actual = [500.0, 800.0, 5000.0];
    let predicted = [100.0, 100.0, 4000.0];

    let metrics = recent().calculate(&actual, &predicted);

    assert_abs_diff_eq!(metrics.mape.unwrap(), 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.accuracy, 80.0, epsilon = 1e-9);
}

#[test]
fn test_recent_window_caps_point_error() {
    let actual = [2000.0, 2000.0, 2000.0];
    let predicted = [10000.0, 10000.0, 10000.0];

    let metrics = recent().calculate(&actual, &predicted);

    assert_abs_diff_eq!(metrics.mape.unwrap(), 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.accuracy, 50.0, epsilon = 1e-9);
}

#[test]
fn test_recent_window_no_material_points() {
    let metrics = recent().calculate(&[10.0, 20.0, 30.0], &[12.0, 18.0, 33.0]);

    assert_eq!(metrics.mape, Some(0.0));
    assert_abs_diff_eq!(metrics.accuracy, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.mae, 7.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_recent_window_insufficient_data_is_zero() {
    let metrics = recent().calculate(&[1500.0, 1600.0], &[1550.0, 1650.0, 1750.0]);
    assert_eq!(metrics, Metrics::zero_recent());

    let metrics = recent().calculate(&[1500.0, 1600.0, 1700.0], &[1550.0]);
    assert_eq!(metrics, Metrics::zero_recent());
}

#[test]
fn test_fitted_value_metrics() {
    let actual = [100.0, 200.0, 300.0, 400.0];
    let fitted = [110.0, 190.0, 310.0, 390.0];

    let metrics = MetricsCalculator::fitted().calculate(&actual, &fitted);

    assert_abs_diff_eq!(metrics.mae, 10.0, epsilon = 1e-9);
    // 100 - 10 / 250 * 100
    assert_abs_diff_eq!(metrics.accuracy, 96.0, epsilon = 1e-9);
    assert_eq!(metrics.mape, None);
    assert_eq!(metrics.rmse, None);
}

#[test]
fn test_fitted_value_accuracy_floored_at_zero() {
    let metrics = MetricsCalculator::fitted().calculate(&[1.0, 2.0, 3.0], &[100.0, 200.0, 300.0]);
    assert_eq!(metrics.accuracy, 0.0);
    assert!(metrics.mae > 0.0);
}

#[test]
fn test_fitted_value_fail_soft() {
    let calculator = MetricsCalculator::fitted();

    assert_eq!(calculator.calculate(&[1.0, 2.0], &[1.0, 2.0]), Metrics::zero_fitted());
    assert_eq!(
        calculator.calculate(&[-1.0, 0.0, 1.0], &[0.0, 0.0, 0.0]),
        Metrics::zero_fitted()
    );
}

#[test]
fn test_metrics_serialization_skips_absent_fields() {
    let metrics = MetricsCalculator::fitted().calculate(&[100.0, 200.0, 300.0], &[100.0, 200.0, 300.0]);
    let json = serde_json::to_value(&metrics).unwrap();

    assert_eq!(json, serde_json::json!({"mae": 0.0, "accuracy": 100.0}));
}

#[test]
fn test_widening_band() {
    let band = ConfidenceBand::Widening;

    let first = band.interval(1000.0, 0);
    assert_abs_diff_eq!(first.lower, 800.0, epsilon = 1e-9);
    assert_abs_diff_eq!(first.upper, 1200.0, epsilon = 1e-9);

    let third = band.interval(1000.0, 2);
    assert_abs_diff_eq!(third.lower, 700.0, epsilon = 1e-9);
    assert_abs_diff_eq!(third.upper, 1300.0, epsilon = 1e-9);
}

#[test]
fn test_fixed_band() {
    let band = ConfidenceBand::Fixed;
    let interval = band.interval(500.0, 10);

    assert_abs_diff_eq!(interval.lower, 400.0, epsilon = 1e-9);
    assert_abs_diff_eq!(interval.upper, 600.0, epsilon = 1e-9);
}

#[test]
fn test_band_lower_bound_never_negative() {
    let band = ConfidenceBand::Widening;

    // Band wider than 100%
    let wide = band.interval(100.0, 20);
    assert_eq!(wide.lower, 0.0);
    assert!(wide.upper > 100.0);

    // Negative point forecast
    let negative = band.interval(-50.0, 0);
    assert_eq!(negative.lower, 0.0);
    assert!(negative.upper >= negative.lower);
}

#[test]
fn test_future_dates_use_fixed_steps() {
    let last = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

    let monthly = future_dates(last, Frequency::Monthly, 2).unwrap();
    assert_eq!(
        monthly,
        vec![
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        ]
    );

    let weekly = future_dates(last, Frequency::Weekly, 1).unwrap();
    assert_eq!(weekly, vec![NaiveDate::from_ymd_opt(2024, 2, 7).unwrap()]);
}

#[test]
fn test_formatter_attaches_dates_and_bands() {
    let last = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let formatter = ResponseFormatter::new(ConfidenceBand::Widening);

    let predictions = formatter
        .format(&[100.0, 200.0], last, Frequency::Daily)
        .unwrap();

    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    assert_eq!(predictions[1].date, NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
    assert_abs_diff_eq!(predictions[1].confidence_interval.lower, 150.0, epsilon = 1e-9);
    assert_abs_diff_eq!(predictions[1].confidence_interval.upper, 250.0, epsilon = 1e-9);
}

#[test]
fn test_confidence_band_parsing() {
    assert_eq!("fixed".parse::<ConfidenceBand>().unwrap(), ConfidenceBand::Fixed);
    assert_eq!("Widening".parse::<ConfidenceBand>().unwrap(), ConfidenceBand::Widening);
    assert!("gaussian".parse::<ConfidenceBand>().is_err());
}
