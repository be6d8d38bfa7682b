use byzantine_generals::consensus::Order;
use byzantine_generals::logger::{self, LogFormat, LOG_FORMAT_ENV};
use byzantine_generals::scenario::{report, sweep, Scenario};
use byzantine_generals::RunConfig;
use std::env;
use std::error::Error;
use std::process::ExitCode;

fn usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {} <number_of_generals> attack|retreat", program);
    eprintln!("  {} --scenario <file.json>", program);
}

async fn run(args: &[String], config: &RunConfig) -> Result<bool, Box<dyn Error>> {
    if args[1] == "--scenario" || args[1] == "-s" {
        let path = args.get(2).ok_or("missing scenario file")?;
        let scenario = Scenario::load(path)?;
        tracing::info!(path = %path, generals = scenario.generals, "running scenario");

        let outcome = scenario.run(config).await?;
        report::print_outcome(&outcome);
        return Ok(outcome.passed());
    }

    let generals: usize = args[1]
        .parse()
        .map_err(|_| format!("number_of_generals must be an integer, got `{}`", args[1]))?;
    let initial: Order = args.get(2).ok_or("missing initial order")?.parse()?;

    tracing::info!(generals, order = %initial, timeout = ?config.wait_bound(), "starting sweep");
    let sweep_report = sweep(generals, initial, config).await?;
    report::print_sweep(&sweep_report);
    Ok(sweep_report.passed())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let format = env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();
    logger::init(format);

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
        return ExitCode::FAILURE;
    }

    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::error!("a run failed verification");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            usage(&args[0]);
            ExitCode::FAILURE
        }
    }
}
