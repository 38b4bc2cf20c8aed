//! Display formatting for offers
//!
//! Pure functions with no failure mode: malformed provider strings degrade
//! to empty output instead of erroring.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::FlightOffer;

/// Display-ready rendering of one offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCard {
    pub price: String,
    pub duration: String,
    pub stops: String,
    pub legs: Vec<String>,
}

/// Parse an ISO-8601 duration like "PT2H30M" into total minutes
pub fn parse_iso_duration(iso: &str) -> Option<u32> {
    let re = Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?$").unwrap();
    let captures = re.captures(iso)?;
    if captures.get(1).is_none() && captures.get(2).is_none() {
        return None;
    }
    let hours: u32 = captures
        .get(1)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let minutes: u32 = captures
        .get(2)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    Some(hours * 60 + minutes)
}

/// "PT2H30M" becomes "2h30"; malformed input becomes ""
pub fn duration_label(iso: &str) -> String {
    match parse_iso_duration(iso) {
        Some(total) => format!("{}h{:02}", total / 60, total % 60),
        None => String::new(),
    }
}

/// Stop count label: "Direto" for non-stop, otherwise "N escala(s)"
pub fn stops_label(stops: usize) -> String {
    if stops == 0 {
        "Direto".to_string()
    } else {
        format!("{} escala(s)", stops)
    }
}

/// Price with the target currency's grouping convention
pub fn price_label(amount: f64, currency: &str) -> String {
    let (thousands, decimal) = match currency {
        "BRL" | "EUR" => ('.', ','),
        _ => (',', '.'),
    };
    let cents = (amount * 100.0).round() as i64;
    let fraction = (cents % 100).abs();
    let integer = (cents / 100).abs();
    let digits = integer.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(c);
    }
    let sign = if cents < 0 { "-" } else { "" };
    format!("{} {}{}{}{:02}", currency, sign, grouped, decimal, fraction)
}

/// Build the display card for one offer.
///
/// Duration and stops come from the outbound itinerary; the legs list one
/// line per segment across all itineraries.
pub fn format_offer(offer: &FlightOffer) -> DisplayCard {
    let outbound = offer.itineraries.first();
    let duration = outbound.map_or(String::new(), |it| duration_label(&it.duration));
    let stops = outbound.map_or(String::new(), |it| stops_label(it.stops()));
    let legs = offer
        .itineraries
        .iter()
        .flat_map(|it| it.segments.iter())
        .map(|segment| format!("{} → {}", segment.origin, segment.destination))
        .collect();
    DisplayCard {
        price: price_label(offer.total_price, &offer.currency),
        duration,
        stops,
        legs,
    }
}
