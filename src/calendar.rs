//! Travelpayouts price-calendar client
//!
//! The alternate provider: cheapest-price rows per date or per month,
//! authenticated by a token query parameter instead of a bearer token.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::TravelpayoutsConfig;
use crate::FareError;

const CALENDAR_TIMEOUT: Duration = Duration::from_secs(30);

/// One flat price row from the calendar endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRow {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_at: String,
    pub price: f64,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub transfers: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(default)]
    data: Vec<PriceRow>,
}

/// Client for the Travelpayouts data API
pub struct CalendarClient {
    http: reqwest::Client,
    config: TravelpayoutsConfig,
}

impl CalendarClient {
    pub fn new(config: TravelpayoutsConfig) -> Result<Self, FareError> {
        let http = reqwest::Client::builder()
            .timeout(CALENDAR_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    /// Cheapest prices for concrete departure dates (YYYY-MM or YYYY-MM-DD)
    #[instrument(level = "info", skip(self))]
    pub async fn prices_for_dates(
        &self,
        origin: &str,
        destination: &str,
        departure_at: &str,
    ) -> Result<Vec<PriceRow>, FareError> {
        self.fetch(
            "/aviasales/v3/prices_for_dates",
            origin,
            destination,
            ("departure_at", departure_at),
        )
        .await
    }

    /// Cheapest price per day over a whole month (YYYY-MM)
    #[instrument(level = "info", skip(self))]
    pub async fn prices_for_month(
        &self,
        origin: &str,
        destination: &str,
        month: &str,
    ) -> Result<Vec<PriceRow>, FareError> {
        self.fetch(
            "/aviasales/v3/prices_for_month",
            origin,
            destination,
            ("month", month),
        )
        .await
    }

    async fn fetch(
        &self,
        path: &str,
        origin: &str,
        destination: &str,
        period: (&str, &str),
    ) -> Result<Vec<PriceRow>, FareError> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                period,
                ("token", self.config.token.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        info!(status = %status, "price calendar lookup completed");
        interpret_calendar_response(status, &body)
    }
}

/// Turn a calendar-endpoint response into rows sorted ascending by price
fn interpret_calendar_response(status: StatusCode, body: &str) -> Result<Vec<PriceRow>, FareError> {
    if !status.is_success() {
        return Err(FareError::Search {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    let parsed: CalendarResponse = serde_json::from_str(body)?;
    let mut rows = parsed.data;
    rows.sort_by(|a, b| a.price.total_cmp(&b.price));
    Ok(rows)
}
