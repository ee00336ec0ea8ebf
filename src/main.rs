use anyhow::Result;
use clap::Parser;
use sales_forecast::ForecastService;
use sales_forecast_service::cli::{run_predict, Cli, Command};
use sales_forecast_service::http;
use sales_forecast_service::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Command::Serve(args) => {
            let service = ForecastService::new(args.pipeline.to_config()?);
            http::serve(&args.addr(), service).await
        }
        Command::Predict(args) => {
            println!("{}", run_predict(&args)?);
            Ok(())
        }
    }
}
