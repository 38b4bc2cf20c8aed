//! HTTP client for the Amadeus Self-Service endpoints

use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::auth::TokenProvider;
use crate::cache::TtlCache;
use crate::config::AmadeusConfig;
use crate::locations::{interpret_locations_response, MIN_KEYWORD_LEN, PAGE_LIMIT};
use crate::offers::interpret_offers_response;
use crate::{FareError, FlightOffer, LocationMatch, SearchCriteria};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);
const LOCATION_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const OFFER_CACHE_TTL: Duration = Duration::from_secs(60);
const CACHE_CAPACITY: usize = 64;

/// Main client for location resolution and flight-offer search.
///
/// Owns the bearer token and the per-call response caches; construct one
/// per session and reuse it across searches.
pub struct AmadeusClient {
    http: Client,
    auth: TokenProvider,
    base_url: String,
    location_cache: Mutex<TtlCache<String, Vec<LocationMatch>>>,
    offer_cache: Mutex<TtlCache<SearchCriteria, Vec<FlightOffer>>>,
}

impl AmadeusClient {
    /// Create a new client from explicit configuration
    pub fn new(config: AmadeusConfig) -> Result<Self, FareError> {
        debug!("creating Amadeus client");
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        let base_url = config.base_url.clone();
        let auth = TokenProvider::with_client(http.clone(), config);
        Ok(Self {
            http,
            auth,
            base_url,
            location_cache: Mutex::new(TtlCache::new(LOCATION_CACHE_TTL, CACHE_CAPACITY)),
            offer_cache: Mutex::new(TtlCache::new(OFFER_CACHE_TTL, CACHE_CAPACITY)),
        })
    }

    /// Resolve a free-text keyword to airport and city matches.
    ///
    /// Keywords shorter than two characters return no matches without a
    /// network call; lookup failures also degrade to no matches.
    #[instrument(level = "info", skip(self))]
    pub async fn locations(&self, keyword: &str) -> Result<Vec<LocationMatch>, FareError> {
        let keyword = keyword.trim();
        if keyword.chars().count() < MIN_KEYWORD_LEN {
            debug!("keyword too short, skipping lookup");
            return Ok(Vec::new());
        }

        let cache_key = keyword.to_lowercase();
        if let Some(matches) = self.location_cache.lock().await.get(&cache_key) {
            debug!("location cache hit");
            return Ok(matches);
        }

        let bearer = self.auth.bearer().await?;
        let url = format!("{}/v1/reference-data/locations", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&bearer)
            .query(&[
                ("subType", "CITY,AIRPORT"),
                ("keyword", keyword),
                ("view", "LIGHT"),
            ])
            .query(&[("page[limit]", PAGE_LIMIT)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        info!(status = %status, "location lookup completed");

        let matches = interpret_locations_response(status, &body);
        self.location_cache
            .lock()
            .await
            .insert(cache_key, matches.clone());
        Ok(matches)
    }

    /// Search flight offers, sorted ascending by total price.
    ///
    /// Criteria are validated before anything goes on the wire. Responses
    /// are memoized for a short interval keyed by the full criteria.
    #[instrument(
        level = "info",
        skip(self, criteria),
        fields(origin = %criteria.origin, destination = %criteria.destination)
    )]
    pub async fn offers(&self, criteria: &SearchCriteria) -> Result<Vec<FlightOffer>, FareError> {
        criteria.validate()?;

        if let Some(offers) = self.offer_cache.lock().await.get(criteria) {
            debug!("offer cache hit");
            return Ok(offers);
        }

        let bearer = self.auth.bearer().await?;
        let url = format!("{}/v2/shopping/flight-offers", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&bearer)
            .timeout(SEARCH_TIMEOUT)
            .query(&[
                ("originLocationCode", criteria.origin.as_str()),
                ("destinationLocationCode", criteria.destination.as_str()),
                ("currencyCode", criteria.currency.as_str()),
            ])
            .query(&[(
                "departureDate",
                criteria.departure_date.format("%Y-%m-%d").to_string(),
            )])
            .query(&[("adults", criteria.adults), ("max", criteria.max_results)]);
        if let Some(return_date) = criteria.return_date {
            request = request.query(&[("returnDate", return_date.format("%Y-%m-%d").to_string())]);
        }
        if criteria.direct_only {
            request = request.query(&[("nonStop", "true")]);
        }

        let start = std::time::Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        info!(
            status = %status,
            duration_ms = start.elapsed().as_millis(),
            "offer search completed"
        );

        let offers = interpret_offers_response(status, &body)?;
        info!(offers_found = offers.len(), "offer search parsed");
        self.offer_cache
            .lock()
            .await
            .insert(criteria.clone(), offers.clone());
        Ok(offers)
    }

    /// Search every origin/destination code pair and concatenate the legs.
    ///
    /// Used when a city resolves to several airports. Per-leg failures are
    /// skipped (logged, not surfaced) and overlapping offers are passed
    /// through without de-duplication; the combined list is re-sorted by
    /// total price.
    pub async fn offers_for_all(
        &self,
        origins: &[String],
        destinations: &[String],
        template: &SearchCriteria,
    ) -> Vec<FlightOffer> {
        let mut combined = Vec::new();
        for origin in origins {
            for destination in destinations {
                let mut criteria = template.clone();
                criteria.origin = origin.clone();
                criteria.destination = destination.clone();
                match self.offers(&criteria).await {
                    Ok(mut offers) => combined.append(&mut offers),
                    Err(e) => {
                        warn!(
                            origin = %origin,
                            destination = %destination,
                            error = %e,
                            "leg search failed, skipping"
                        );
                    }
                }
            }
        }
        combined.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn unreachable_client() -> AmadeusClient {
        let config = AmadeusConfig::new("id", "secret").with_base_url("http://127.0.0.1:9");
        AmadeusClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let config = AmadeusConfig::new("id", "secret");
        assert!(AmadeusClient::new(config).is_ok());
    }

    #[tokio::test]
    async fn test_short_keyword_skips_network() {
        // The base URL is unreachable, so any network attempt would error
        let client = unreachable_client();
        let matches = client.locations("a").await.unwrap();
        assert!(matches.is_empty());

        let matches = client.locations(" ").await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_criteria_rejected_before_network() {
        let client = unreachable_client();
        let mut criteria = SearchCriteria::new(
            "GRU",
            "MCZ",
            chrono::Local::now().date_naive() + chrono::Duration::days(10),
        );
        criteria.adults = 0;
        let result = client.offers(&criteria).await;
        assert!(matches!(result, Err(FareError::InvalidCriteria(_))));
    }

    #[tokio::test]
    async fn test_past_departure_rejected_before_network() {
        let client = unreachable_client();
        let criteria = SearchCriteria::new(
            "GRU",
            "MCZ",
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
        );
        let result = client.offers(&criteria).await;
        assert!(matches!(result, Err(FareError::InvalidCriteria(_))));
    }

    #[tokio::test]
    async fn test_fanout_swallows_leg_failures() {
        let client = unreachable_client();
        let template = SearchCriteria::new(
            "",
            "",
            chrono::Local::now().date_naive() + chrono::Duration::days(10),
        );
        let offers = client
            .offers_for_all(
                &["GRU".to_string(), "CGH".to_string()],
                &["MCZ".to_string()],
                &template,
            )
            .await;
        assert!(offers.is_empty());
    }
}
