use clap::Parser;
use pretty_assertions::assert_eq;
use sales_forecast::ConfidenceBand;
use sales_forecast_service::cli::{run_predict, Cli, Command};
use sales_forecast_service::logging::LogFormat;
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

fn sales_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "fecha,ventas").unwrap();
    for (month, value) in [1200.0, 1350.0, 1280.0, 1420.0, 1500.0, 1610.0].iter().enumerate() {
        writeln!(file, "2024-{:02}-01,{}", month + 1, value).unwrap();
    }
    file
}

#[test]
fn test_serve_defaults() {
    let cli = Cli::try_parse_from(["sales-forecast", "serve"]).unwrap();

    match cli.command {
        Command::Serve(args) => {
            assert_eq!(args.port, 8000);
            assert_eq!(args.addr(), "0.0.0.0:8000");
            assert_eq!(args.pipeline.confidence_band, ConfidenceBand::Widening);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "sales-forecast",
        "serve",
        "--port",
        "9100",
        "--log-format",
        "json",
        "--confidence-band",
        "fixed",
    ])
    .unwrap();

    assert_eq!(cli.log_format, LogFormat::Json);
    match cli.command {
        Command::Serve(args) => {
            assert_eq!(args.port, 9100);
            assert_eq!(args.pipeline.confidence_band, ConfidenceBand::Fixed);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_unknown_confidence_band_is_rejected() {
    let result = Cli::try_parse_from(["sales-forecast", "serve", "--confidence-band", "wide"]);
    assert!(result.is_err());
}

#[test]
fn test_predict_prints_response_json() {
    let csv = sales_csv();
    let path = csv.path().to_str().unwrap();
    let cli = Cli::try_parse_from([
        "sales-forecast",
        "predict",
        "--input",
        path,
        "--method",
        "lineal",
        "--periods",
        "2",
        "--frequency",
        "mensual",
    ])
    .unwrap();

    let Command::Predict(args) = cli.command else {
        panic!("expected predict");
    };
    let output: Value = serde_json::from_str(&run_predict(&args).unwrap()).unwrap();

    assert_eq!(output["predictions"].as_array().unwrap().len(), 2);
    assert_eq!(output["model_info"]["type"], "linear_regression");
}

#[test]
fn test_predict_reports_validation_errors() {
    let csv = sales_csv();
    let path = csv.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["sales-forecast", "predict", "-i", path, "-m", "estacional"]).unwrap();

    let Command::Predict(args) = cli.command else {
        panic!("expected predict");
    };
    let err = run_predict(&args).unwrap_err();

    assert!(err.to_string().contains("Seasonality"));
}

#[test]
fn test_predict_rejects_non_finite_sales() {
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "date,value").unwrap();
    writeln!(csv, "2024-01-01,1200").unwrap();
    writeln!(csv, "2024-02-01,NaN").unwrap();
    writeln!(csv, "2024-03-01,1300").unwrap();
    let path = csv.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["sales-forecast", "predict", "-i", path]).unwrap();

    let Command::Predict(args) = cli.command else {
        panic!("expected predict");
    };
    let err = run_predict(&args).unwrap_err();

    assert!(err.to_string().contains("finite non-negative"));
}
