mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use serde::Serialize;

use cli::{Cli, Commands, SymbolArgs};
use yfetch::config::load_client_config;
use yfetch::domain::{DateRange, QuoteParam};
use yfetch::records::{load_symbols, save_history};
use yfetch::utils::parse_date;
use yfetch::{ClientConfig, YahooClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_client_config(path).context("Failed to load configuration")?,
        None => ClientConfig::builtin(),
    };
    if cli.quiet {
        config.request.verbose = false;
    }

    let client = YahooClient::new(&config)?;

    match cli.command {
        Commands::Quotes(ref args) => {
            let symbols = collect_symbols(args)?;
            match client.fetch_quotes(&symbols, &config.request).await {
                Ok(quotes) => {
                    for symbol in symbols.iter().filter(|symbol| !symbol.trim().is_empty()) {
                        if !quotes.contains_key(symbol) {
                            warn!("No quote returned for {}", symbol);
                        }
                    }
                    print_json(&quotes)?;
                }
                Err(err) => {
                    print_json(&err.partial)?;
                    return Err(err).context("Quote retrieval stopped early");
                }
            }
        }
        Commands::History {
            ref symbols,
            interval,
            ref start,
            ref end,
            burst,
            strict_timeout,
            max_in_flight,
            ref output,
            format,
        } => {
            let symbols = collect_symbols(symbols)?;
            let range = DateRange::from_dates(
                parse_date(start).context("Invalid --start date")?,
                parse_date(end).context("Invalid --end date")?,
            );

            let mut request = config.request.clone();
            request.hard_timeout |= strict_timeout;
            if max_in_flight.is_some() {
                request.max_in_flight = max_in_flight;
            }

            let results = if burst {
                client
                    .fetch_all_burst(&symbols, interval, &range, &request)
                    .await
            } else {
                client
                    .fetch_all_sequential(&symbols, interval, &range, &request)
                    .await
            };

            let failed = results.iter().filter(|result| !result.is_ok()).count();
            match output {
                Some(dir) => {
                    for result in results.iter().filter(|result| result.is_ok()) {
                        let path = save_history(result, dir, format.into())?;
                        info!("Saved {} to {}", result.symbol, path.display());
                    }
                }
                None => print_json(&results)?,
            }

            if failed > 0 {
                warn!("{} of {} symbols failed", failed, results.len());
            }
        }
        Commands::Summary {
            ref symbol,
            ref modules,
        } => {
            let modules = modules
                .iter()
                .map(|name| name.parse::<QuoteParam>())
                .collect::<Result<Vec<_>, _>>()?;
            let summary = client
                .quote_summary(symbol, &modules, &config.request)
                .await?;
            print_json(&summary)?;
        }
        Commands::Currencies => {
            let currencies = client.currencies(&config.request).await?;
            print_json(&currencies)?;
        }
        Commands::Markets => {
            let markets = client.markets_summary(&config.request).await?;
            print_json(&markets)?;
        }
    }

    Ok(())
}

fn collect_symbols(args: &SymbolArgs) -> Result<Vec<String>> {
    let mut symbols = args.symbols.clone();
    if let Some(path) = &args.symbols_file {
        symbols.extend(load_symbols(path)?);
    }
    if symbols.is_empty() {
        bail!("No symbols given; pass them as arguments or with --symbols-file");
    }
    Ok(symbols)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
