//! Basic flight-offer search example

use chrono::NaiveDate;
use fare_scout::{format_offer, resolve_locations, search_offers, AmadeusConfig, SearchCriteria};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AmadeusConfig::from_env()?;

    // Resolve the destination from free text first
    let matches = resolve_locations(config.clone(), "Maceio").await?;
    for m in &matches {
        println!("{} — {}", m.code, m.name);
    }

    // Search offers for a fixed route
    let mut criteria = SearchCriteria::new(
        "GRU",
        "MCZ",
        NaiveDate::from_ymd_opt(2026, 9, 21).unwrap(),
    );
    criteria.adults = 2;

    println!("Searching for offers from GRU to MCZ...");
    let offers = search_offers(config, criteria).await?;

    println!("Found {} offers", offers.len());
    for offer in offers.iter().take(3) {
        let card = format_offer(offer);
        println!("{} | {} | {}", card.price, card.stops, card.duration);
        println!("  {}", card.legs.join(" · "));
    }

    Ok(())
}
