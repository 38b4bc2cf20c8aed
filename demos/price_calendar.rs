//! Price-calendar lookup example using the Travelpayouts provider

use fare_scout::{CalendarClient, TravelpayoutsConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TravelpayoutsConfig::from_env()?;
    let client = CalendarClient::new(config)?;

    let rows = client.prices_for_month("GRU", "MCZ", "2026-09").await?;
    println!("Found {} priced dates", rows.len());
    for row in rows.iter().take(10) {
        println!(
            "{}  {:>10.2}  {}",
            row.departure_at,
            row.price,
            row.airline.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
