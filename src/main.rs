//! cambio CLI
//!
//! Query current and synthesized historical exchange rates against BRL.
//!
//! # Usage
//!
//! ```bash
//! # Current USD rate
//! cambio rate USD
//!
//! # All dashboard currencies as JSON
//! cambio rates --format json
//!
//! # 90 days of synthesized EUR history
//! cambio history EUR --days 90
//! ```
//!
//! Connection settings come from `CAMBIO_*` environment variables; logging is
//! controlled with `RUST_LOG`.

use cambio_engine::config::ExchangeConfig;
use cambio_engine::core::currency::CurrencyCode;
use cambio_engine::core::rate::Rate;
use cambio_engine::error::RateError;
use cambio_engine::history::synthesizer::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use cambio_engine::service::ExchangeService;
use clap::{Parser, Subcommand, ValueEnum};
use std::process;

#[derive(Debug, Parser)]
#[command(name = "cambio", version, about = "Current and historical exchange rates against BRL")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Current rate for one currency.
    Rate {
        /// 3-letter currency code, e.g. USD.
        #[arg(value_parser = parse_code)]
        code: CurrencyCode,
    },
    /// Current rates for every configured currency.
    Rates,
    /// Synthesized daily history ending today.
    History {
        #[arg(value_parser = parse_code)]
        code: CurrencyCode,
        /// Window length in days.
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
        days: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_code(raw: &str) -> Result<CurrencyCode, String> {
    CurrencyCode::parse(raw).map_err(|e| e.to_string())
}

#[derive(serde::Serialize)]
struct RateOutput<'a> {
    currency: &'a str,
    rate: f64,
    base: &'a str,
    last_updated: String,
}

impl<'a> From<&'a Rate> for RateOutput<'a> {
    fn from(rate: &'a Rate) -> Self {
        Self {
            currency: rate.currency().as_str(),
            rate: rate.value(),
            base: rate.base_symbol().as_str(),
            last_updated: rate.as_of().to_rfc3339(),
        }
    }
}

fn print_rates(rates: &[Rate], format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Json => {
            let output: Vec<RateOutput> = rates.iter().map(RateOutput::from).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            for rate in rates {
                println!("{}", rate);
            }
        }
    }
    Ok(())
}

fn fail(error: RateError) -> ! {
    log::error!("{}", error);
    eprintln!("{}", error.user_message());
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = ExchangeConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(2);
    });
    let service = ExchangeService::new(config).unwrap_or_else(|e| fail(e));

    let printed = match cli.command {
        Command::Rate { code } => {
            let rate = service.current_rate(&code).await.unwrap_or_else(|e| fail(e));
            print_rates(std::slice::from_ref(&rate), cli.format)
        }
        Command::Rates => {
            let rates = service.all_current_rates().await.unwrap_or_else(|e| fail(e));
            print_rates(&rates, cli.format)
        }
        Command::History { code, days } => {
            let series = service
                .historical_rates(&code, days)
                .await
                .unwrap_or_else(|e| fail(e));
            match cli.format {
                OutputFormat::Json => serde_json::to_string_pretty(&series).map(|json| {
                    println!("{}", json);
                }),
                OutputFormat::Text => {
                    print!("{}", series);
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = printed {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}
