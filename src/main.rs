//! CLI interface for fare-scout

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fare_scout::{
    format_offer, resolve_locations, search_offers, AmadeusConfig, CalendarClient, FareError,
    LocationKind, SearchCriteria, TravelpayoutsConfig,
};
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fare-scout")]
#[command(about = "Flight-offer lookup over the Amadeus and Travelpayouts APIs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a free-text keyword to airport and city codes
    Locations {
        /// City or airport name fragment
        keyword: String,
    },
    /// Search flight offers
    Search {
        /// Origin IATA code
        #[arg(short, long)]
        from: String,
        /// Destination IATA code
        #[arg(short, long)]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Return date for round trips (YYYY-MM-DD)
        #[arg(short, long)]
        return_date: Option<String>,
        /// Number of adults
        #[arg(long, default_value = "1")]
        adults: u32,
        /// Currency code for prices
        #[arg(long, default_value = "BRL")]
        currency: String,
        /// Only non-stop flights
        #[arg(long)]
        direct: bool,
        /// Maximum number of offers to return
        #[arg(long, default_value = "20")]
        max: u32,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Cheapest prices per date from the price calendar
    Calendar {
        /// Origin IATA code
        #[arg(short, long)]
        origin: String,
        /// Destination IATA code
        #[arg(short, long)]
        destination: String,
        /// Departure period (YYYY-MM or YYYY-MM-DD)
        #[arg(long, conflicts_with = "month")]
        departure_at: Option<String>,
        /// Whole month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, FareError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FareError::DateParse(format!("expected YYYY-MM-DD, got {}", value)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Locations { keyword } => {
            let config = AmadeusConfig::from_env()?;
            let matches = resolve_locations(config, &keyword).await?;
            if matches.is_empty() {
                println!("No locations matched '{}'", keyword);
                return Ok(());
            }
            for m in matches {
                let kind = match m.kind {
                    LocationKind::Airport => "airport",
                    LocationKind::City => "city",
                };
                println!("{} — {} ({})", m.code, m.name, kind);
            }
        }

        Commands::Search {
            from,
            to,
            date,
            return_date,
            adults,
            currency,
            direct,
            max,
            output,
        } => {
            let config = AmadeusConfig::from_env()?;
            let mut criteria = SearchCriteria::new(&from, &to, parse_date(&date)?);
            criteria.return_date = return_date.as_deref().map(parse_date).transpose()?;
            criteria.adults = adults;
            criteria.currency = currency;
            criteria.direct_only = direct;
            criteria.max_results = max;

            println!("Searching for offers...");
            match search_offers(config, criteria).await {
                Ok(offers) => {
                    if offers.is_empty() {
                        println!("No flights found.");
                        return Ok(());
                    }

                    if let Some(output_file) = output {
                        let json = serde_json::to_string_pretty(&offers)?;
                        fs::write(&output_file, &json)?;
                        println!("Results saved to {}", output_file);
                    } else {
                        for (i, offer) in offers.iter().enumerate() {
                            let card = format_offer(offer);
                            println!("\n--- Offer {} ---", i + 1);
                            println!("Price: {}", card.price);
                            println!("{} • {}", card.stops, card.duration);
                            println!("{}", card.legs.join(" · "));
                        }
                    }

                    // Print summary
                    println!("\nFound {} offers", offers.len());
                    let cheapest = format_offer(&offers[0]);
                    println!("Cheapest: {}", cheapest.price);
                }
                Err(e) => {
                    eprintln!("Error searching for offers: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Calendar {
            origin,
            destination,
            departure_at,
            month,
        } => {
            let config = TravelpayoutsConfig::from_env()?;
            let client = CalendarClient::new(config)?;
            let rows = match (departure_at, month) {
                (Some(period), _) => client.prices_for_dates(&origin, &destination, &period).await,
                (None, Some(period)) => client.prices_for_month(&origin, &destination, &period).await,
                (None, None) => bail!("provide --departure-at or --month"),
            };
            match rows {
                Ok(rows) => {
                    if rows.is_empty() {
                        println!("No prices found.");
                        return Ok(());
                    }
                    for row in rows {
                        let airline = row.airline.unwrap_or_default();
                        let transfers = row
                            .transfers
                            .map(|t| t.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "{:>10.2}  {} → {}  {}  {}  escalas: {}",
                            row.price, row.origin, row.destination, row.departure_at, airline,
                            transfers
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Error fetching price calendar: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        // Test basic search command
        let cli = Cli::try_parse_from([
            "fare-scout",
            "search",
            "--from",
            "GRU",
            "--to",
            "MCZ",
            "--date",
            "2026-09-21",
        ]);

        assert!(cli.is_ok());

        if let Ok(Cli {
            command:
                Commands::Search {
                    from, to, date, ..
                },
        }) = cli
        {
            assert_eq!(from, "GRU");
            assert_eq!(to, "MCZ");
            assert_eq!(date, "2026-09-21");
        }
    }

    #[test]
    fn test_calendar_rejects_conflicting_periods() {
        let cli = Cli::try_parse_from([
            "fare-scout",
            "calendar",
            "--origin",
            "GRU",
            "--destination",
            "MCZ",
            "--departure-at",
            "2026-09",
            "--month",
            "2026-09",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2026-09-21").is_ok());
        assert!(matches!(
            parse_date("21/09/2026"),
            Err(FareError::DateParse(_))
        ));
    }
}
