//! # Fare Scout Library
//!
//! A Rust client for flight-offer lookup over the Amadeus Self-Service API,
//! with a secondary Travelpayouts price-calendar client. The crate resolves
//! free-text locations to IATA codes, manages the OAuth2 bearer token, and
//! returns flight offers sorted by total price, ready for display.

pub mod auth;
pub mod cache;
pub mod calendar;
pub mod client;
pub mod config;
pub mod format;
pub mod locations;
pub mod offers;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types for convenience
pub use auth::TokenProvider;
pub use calendar::{CalendarClient, PriceRow};
pub use client::AmadeusClient;
pub use config::{AmadeusConfig, TravelpayoutsConfig};
pub use format::{format_offer, DisplayCard};

/// Error types for the fare lookup library
#[derive(Error, Debug)]
pub enum FareError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token exchange failed with status {status}: {body}")]
    Auth { status: u16, body: String },

    #[error("token response is malformed: {0}")]
    MalformedToken(String),

    #[error("offer search failed with status {status}: {body}")]
    Search { status: u16, body: String },

    #[error("response decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing configuration: {0}")]
    Config(String),

    #[error("invalid search criteria: {0}")]
    InvalidCriteria(String),

    #[error("invalid date format: {0}")]
    DateParse(String),
}

/// Kind of location returned by the reference-data lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Airport,
    City,
}

/// A resolved location: IATA code plus the display name it was matched under.
///
/// Carried as a structured value through the whole flow so callers never
/// have to re-parse a formatted label to get the code back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMatch {
    pub code: String,
    pub name: String,
    pub kind: LocationKind,
}

/// Parameters for one offer search
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub currency: String,
    pub direct_only: bool,
    pub max_results: u32,
}

impl SearchCriteria {
    /// Create criteria with the default passenger count, currency and limits
    pub fn new(origin: &str, destination: &str, departure_date: NaiveDate) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date,
            return_date: None,
            adults: 1,
            currency: "BRL".to_string(),
            direct_only: false,
            max_results: 20,
        }
    }

    /// Check the invariants before anything goes on the wire.
    ///
    /// Rejects empty codes, `adults == 0`, a departure date in the past,
    /// and a return date earlier than the departure date.
    pub fn validate(&self) -> Result<(), FareError> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(FareError::InvalidCriteria(
                "origin and destination codes are required".to_string(),
            ));
        }
        if self.adults < 1 {
            return Err(FareError::InvalidCriteria(format!(
                "adults must be at least 1, got {}",
                self.adults
            )));
        }
        let today = chrono::Local::now().date_naive();
        if self.departure_date < today {
            return Err(FareError::InvalidCriteria(format!(
                "departure date {} is in the past",
                self.departure_date
            )));
        }
        if let Some(return_date) = self.return_date {
            if return_date < self.departure_date {
                return Err(FareError::InvalidCriteria(format!(
                    "return date {} is before departure date {}",
                    return_date, self.departure_date
                )));
            }
        }
        Ok(())
    }
}

/// A priced, bookable offer returned by the search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOffer {
    pub total_price: f64,
    pub currency: String,
    pub itineraries: Vec<Itinerary>,
}

/// One direction of travel, composed of one or more segments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    /// ISO-8601 duration as returned by the provider (e.g. "PT2H30M")
    pub duration: String,
    pub segments: Vec<Segment>,
}

impl Itinerary {
    /// Total duration in minutes, `None` if the provider string is malformed
    pub fn duration_minutes(&self) -> Option<u32> {
        format::parse_iso_duration(&self.duration)
    }

    /// Number of intermediate stops
    pub fn stops(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

/// A single non-stop flight leg between two airports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub carrier_code: String,
}

/// Resolve a free-text keyword to airport and city codes.
///
/// # Example
/// ```rust,no_run
/// use fare_scout::{resolve_locations, AmadeusConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AmadeusConfig::from_env()?;
/// let matches = resolve_locations(config, "Sao Paulo").await?;
/// for m in &matches {
///     println!("{} — {}", m.code, m.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn resolve_locations(
    config: AmadeusConfig,
    keyword: &str,
) -> Result<Vec<LocationMatch>, FareError> {
    let client = AmadeusClient::new(config)?;
    client.locations(keyword).await
}

/// Search flight offers for the given criteria, sorted ascending by price.
///
/// # Example
/// ```rust,no_run
/// use chrono::NaiveDate;
/// use fare_scout::{search_offers, AmadeusConfig, SearchCriteria};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AmadeusConfig::from_env()?;
/// let criteria = SearchCriteria::new(
///     "GRU",
///     "MCZ",
///     NaiveDate::from_ymd_opt(2026, 9, 21).unwrap(),
/// );
/// let offers = search_offers(config, criteria).await?;
/// println!("Found {} offers", offers.len());
/// # Ok(())
/// # }
/// ```
pub async fn search_offers(
    config: AmadeusConfig,
    criteria: SearchCriteria,
) -> Result<Vec<FlightOffer>, FareError> {
    let client = AmadeusClient::new(config)?;
    client.offers(&criteria).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn future_date() -> NaiveDate {
        chrono::Local::now().date_naive() + chrono::Duration::days(21)
    }

    #[test]
    fn test_criteria_defaults() {
        let criteria = SearchCriteria::new("GRU", "MCZ", future_date());
        assert_eq!(criteria.adults, 1);
        assert_eq!(criteria.currency, "BRL");
        assert!(!criteria.direct_only);
        assert!(criteria.return_date.is_none());
        assert_eq!(criteria.max_results, 20);
    }

    #[test]
    fn test_criteria_valid() {
        let criteria = SearchCriteria::new("GRU", "MCZ", future_date());
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_criteria_rejects_zero_adults() {
        let mut criteria = SearchCriteria::new("GRU", "MCZ", future_date());
        criteria.adults = 0;
        assert!(matches!(
            criteria.validate(),
            Err(FareError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn test_criteria_rejects_past_departure() {
        let criteria = SearchCriteria::new(
            "GRU",
            "MCZ",
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
        );
        assert!(matches!(
            criteria.validate(),
            Err(FareError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn test_criteria_rejects_return_before_departure() {
        let mut criteria = SearchCriteria::new("GRU", "MCZ", future_date());
        criteria.return_date = Some(criteria.departure_date - chrono::Duration::days(3));
        assert!(matches!(
            criteria.validate(),
            Err(FareError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn test_criteria_accepts_same_day_return() {
        let mut criteria = SearchCriteria::new("GRU", "MCZ", future_date());
        criteria.return_date = Some(criteria.departure_date);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_criteria_rejects_empty_codes() {
        let criteria = SearchCriteria::new("", "MCZ", future_date());
        assert!(matches!(
            criteria.validate(),
            Err(FareError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn test_itinerary_stops() {
        let segment = Segment {
            origin: "GRU".to_string(),
            destination: "BSB".to_string(),
            departure_time: "2026-09-21T09:05:00".to_string(),
            arrival_time: "2026-09-21T11:00:00".to_string(),
            carrier_code: "LA".to_string(),
        };
        let direct = Itinerary {
            duration: "PT1H55M".to_string(),
            segments: vec![segment.clone()],
        };
        assert_eq!(direct.stops(), 0);

        let one_stop = Itinerary {
            duration: "PT5H10M".to_string(),
            segments: vec![segment.clone(), segment],
        };
        assert_eq!(one_stop.stops(), 1);
    }

    #[test]
    fn test_itinerary_duration_minutes() {
        let itinerary = Itinerary {
            duration: "PT2H30M".to_string(),
            segments: vec![],
        };
        assert_eq!(itinerary.duration_minutes(), Some(150));

        let malformed = Itinerary {
            duration: "2h30".to_string(),
            segments: vec![],
        };
        assert_eq!(malformed.duration_minutes(), None);
    }
}
