//! Breaker simulator.
//!
//! Drives an [`AsyncCircuitBreaker`] against a scripted primary operation
//! and prints how each call was routed.
//!
//! ```text
//! breaker-sim --outcomes ffffss --calls 20 --release 5 --fallback
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use fallback_breaker::config::validation::validate_config;
use fallback_breaker::config::{load_config, LoadError, SimulatorConfig};
use fallback_breaker::observability::init_logging;
use fallback_breaker::{AsyncCircuitBreaker, BreakerError, BreakerSnapshot};

#[derive(Parser)]
#[command(name = "breaker-sim")]
#[command(about = "Simulate a circuit breaker against a scripted backend", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Primary outcomes, cycled: 's' succeeds, 'f' fails.
    #[arg(short, long, default_value = "fffsss")]
    outcomes: String,

    /// Number of calls to make through the breaker.
    #[arg(short = 'n', long, default_value_t = 20)]
    calls: usize,

    /// Override the breaker name.
    #[arg(long)]
    name: Option<String>,

    /// Override the trigger threshold.
    #[arg(long)]
    trigger: Option<u32>,

    /// Override the release threshold.
    #[arg(long)]
    release: Option<u32>,

    /// Install a fallback that always succeeds.
    #[arg(long)]
    fallback: bool,

    /// Simulated latency of each primary call in milliseconds.
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Print one JSON object per call.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CallRecord {
    call: usize,
    outcome: String,
    breaker: BreakerSnapshot,
}

fn parse_outcomes(script: &str) -> Result<Vec<bool>, String> {
    let outcomes = script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c.to_ascii_lowercase() {
            's' => Ok(true),
            'f' => Ok(false),
            other => Err(format!("invalid outcome '{}', expected 's' or 'f'", other)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if outcomes.is_empty() {
        return Err("outcome script must not be empty".to_string());
    }
    Ok(outcomes)
}

fn resolve_config(cli: &Cli) -> Result<SimulatorConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimulatorConfig::default(),
    };

    if let Some(name) = &cli.name {
        config.breaker.name = Some(name.clone());
    }
    if let Some(trigger) = cli.trigger {
        config.breaker.trigger_threshold = trigger;
    }
    if let Some(release) = cli.release {
        config.breaker.release_threshold = release;
    }
    if !cli.fallback && config.breaker.name.is_none() {
        config.breaker.name = Some("sim".to_string());
    }

    validate_config(&config).map_err(LoadError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let script = Arc::new(parse_outcomes(&cli.outcomes)?);

    init_logging(&config.observability)?;

    tracing::info!(
        trigger_threshold = config.breaker.trigger_threshold,
        release_threshold = config.breaker.release_threshold,
        fallback = cli.fallback,
        "Configuration loaded"
    );

    let attempts = Arc::new(AtomicUsize::new(0));
    let latency = Duration::from_millis(cli.latency_ms);
    let primary = move |call: usize| {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
        let succeed = script[attempt % script.len()];
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if succeed {
                Ok(format!("primary served call {}", call))
            } else {
                Err(format!("primary failed call {}", call))
            }
        }
    };

    let mut builder = AsyncCircuitBreaker::builder(primary).config(&config.breaker);
    if cli.fallback {
        builder = builder.fallback(|call: usize| async move { Ok(format!("fallback served call {}", call)) });
    }
    let breaker = builder.build()?;

    for call in 1..=cli.calls {
        let outcome = match breaker.invoke(call).await {
            Ok(value) => value,
            Err(BreakerError::Operation(e)) => format!("error: {}", e),
            Err(e @ BreakerError::Open { .. }) => format!("rejected: {}", e),
        };
        let snapshot = breaker.snapshot();

        if cli.json {
            let record = CallRecord {
                call,
                outcome,
                breaker: snapshot,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!(
                "{:>4}  {:<40} mode={:<6} score={} probes={}",
                call, outcome, snapshot.mode, snapshot.failure_score, snapshot.fallback_probe_count
            );
        }
    }

    Ok(())
}
