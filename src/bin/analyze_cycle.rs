//! Run the indicator pipeline on one trade cycle without the HTTP service

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use serde::Serialize;
use std::path::PathBuf;

use trade_report::models::GenerateReportRequest;
use trade_report::sample::{MarketScenario, SyntheticCycleGenerator};
use trade_report::{ReportGenerator, Settings, TechnicalAnalysis, TradeAnalysis};

#[derive(Debug, Parser)]
#[command(name = "analyze_cycle", version)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "synthetic"])))]
struct Args {
    /// JSON file holding a report request
    #[arg(long)]
    input: Option<PathBuf>,

    /// Generate a cycle instead: uptrend, downtrend, sideways or volatile
    #[arg(long)]
    synthetic: Option<MarketScenario>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Candles in a synthetic cycle
    #[arg(long, default_value_t = 120)]
    candles: usize,

    /// Minutes between synthetic candles
    #[arg(long, default_value_t = 1440)]
    interval_minutes: i64,

    /// Also request the model report (needs OPENAI_API_KEY)
    #[arg(long)]
    report: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    trade_cycle_id: i64,
    symbol: &'a str,
    candles: usize,
    analysis: TradeAnalysis,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("trade_report=info")
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let request = load_request(&args)?;
    if let Err(e) = request.validate() {
        bail!("Invalid request: {}", e);
    }

    let analysis = TechnicalAnalysis::default().calculate(&request.chart_data, &request.trade_points);
    let output = Output {
        trade_cycle_id: request.trade_cycle_id,
        symbol: &request.symbol,
        candles: request.chart_data.len(),
        analysis,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if args.report {
        let settings = Settings::load().context("Failed to load settings")?;
        let generator = ReportGenerator::from_settings(&settings)
            .context("Failed to build OpenAI client")?;
        let response = generator
            .generate_response(&request)
            .await
            .context("Report generation failed")?;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}

fn load_request(args: &Args) -> Result<GenerateReportRequest> {
    if let Some(path) = &args.input {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()));
    }

    match args.synthetic {
        Some(scenario) => Ok(SyntheticCycleGenerator::new(args.seed).generate_cycle(
            scenario,
            args.candles,
            args.interval_minutes,
        )),
        None => bail!("either --input or --synthetic is required"),
    }
}
