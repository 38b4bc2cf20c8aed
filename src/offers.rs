//! Flight-offer search wire model
//!
//! Wire model and interpretation for `/v2/shopping/flight-offers`. A
//! non-success status surfaces the raw response body in the error; zero
//! offers is a valid result, not a failure.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use crate::{FareError, FlightOffer, Itinerary, Segment};

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<OfferRow>,
}

#[derive(Debug, Deserialize)]
struct OfferRow {
    price: PriceBlock,
    #[serde(default)]
    itineraries: Vec<ItineraryRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceBlock {
    #[serde(default)]
    grand_total: String,
    #[serde(default)]
    currency: String,
}

#[derive(Debug, Deserialize)]
struct ItineraryRow {
    #[serde(default)]
    duration: String,
    #[serde(default)]
    segments: Vec<SegmentRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentRow {
    departure: EndpointRow,
    arrival: EndpointRow,
    #[serde(default)]
    carrier_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointRow {
    #[serde(default)]
    iata_code: String,
    #[serde(default)]
    at: String,
}

/// Turn an offer-endpoint response into offers sorted ascending by price
pub(crate) fn interpret_offers_response(
    status: StatusCode,
    body: &str,
) -> Result<Vec<FlightOffer>, FareError> {
    if !status.is_success() {
        return Err(FareError::Search {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: OffersResponse = serde_json::from_str(body)?;
    let mut offers: Vec<FlightOffer> = parsed
        .data
        .into_iter()
        .filter_map(|row| {
            let total_price: f64 = match row.price.grand_total.parse() {
                Ok(value) => value,
                Err(_) => {
                    warn!(
                        grand_total = %row.price.grand_total,
                        "offer skipped, price did not parse"
                    );
                    return None;
                }
            };
            Some(FlightOffer {
                total_price,
                currency: row.price.currency,
                itineraries: row.itineraries.into_iter().map(map_itinerary).collect(),
            })
        })
        .collect();

    offers.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
    Ok(offers)
}

fn map_itinerary(row: ItineraryRow) -> Itinerary {
    Itinerary {
        duration: row.duration,
        segments: row
            .segments
            .into_iter()
            .map(|segment| Segment {
                origin: segment.departure.iata_code,
                destination: segment.arrival.iata_code,
                departure_time: segment.departure.at,
                arrival_time: segment.arrival.at,
                carrier_code: segment.carrier_code,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "data": [
            {
                "price": {"grandTotal": "812.40", "currency": "BRL"},
                "itineraries": [
                    {
                        "duration": "PT4H45M",
                        "segments": [
                            {
                                "departure": {"iataCode": "GRU", "at": "2026-09-21T06:10:00"},
                                "arrival": {"iataCode": "BSB", "at": "2026-09-21T08:00:00"},
                                "carrierCode": "G3"
                            },
                            {
                                "departure": {"iataCode": "BSB", "at": "2026-09-21T09:10:00"},
                                "arrival": {"iataCode": "MCZ", "at": "2026-09-21T10:55:00"},
                                "carrierCode": "G3"
                            }
                        ]
                    }
                ]
            },
            {
                "price": {"grandTotal": "645.18", "currency": "BRL"},
                "itineraries": [
                    {
                        "duration": "PT2H30M",
                        "segments": [
                            {
                                "departure": {"iataCode": "GRU", "at": "2026-09-21T09:05:00"},
                                "arrival": {"iataCode": "MCZ", "at": "2026-09-21T11:35:00"},
                                "carrierCode": "LA"
                            }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_offers_sorted_ascending_by_price() {
        let offers = interpret_offers_response(StatusCode::OK, SAMPLE).unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].total_price, 645.18);
        assert_eq!(offers[1].total_price, 812.40);
    }

    #[test]
    fn test_offer_fields_are_mapped() {
        let offers = interpret_offers_response(StatusCode::OK, SAMPLE).unwrap();
        let cheapest = &offers[0];
        assert_eq!(cheapest.currency, "BRL");
        assert_eq!(cheapest.itineraries.len(), 1);
        let itinerary = &cheapest.itineraries[0];
        assert_eq!(itinerary.duration, "PT2H30M");
        assert_eq!(itinerary.segments.len(), 1);
        let segment = &itinerary.segments[0];
        assert_eq!(segment.origin, "GRU");
        assert_eq!(segment.destination, "MCZ");
        assert_eq!(segment.departure_time, "2026-09-21T09:05:00");
        assert_eq!(segment.carrier_code, "LA");
    }

    #[test]
    fn test_empty_data_is_empty_result() {
        let offers = interpret_offers_response(StatusCode::OK, r#"{"data": []}"#).unwrap();
        assert!(offers.is_empty());
    }

    #[test]
    fn test_non_success_carries_raw_body() {
        let body = r#"{"errors":[{"status":400,"title":"INVALID DATE"}]}"#;
        let result = interpret_offers_response(StatusCode::BAD_REQUEST, body);
        match result {
            Err(FareError::Search { status, body: raw }) => {
                assert_eq!(status, 400);
                assert!(raw.contains("INVALID DATE"));
            }
            other => panic!("expected Search error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_success_body_is_decode_error() {
        let result = interpret_offers_response(StatusCode::OK, "not json");
        assert!(matches!(result, Err(FareError::Decode(_))));
    }

    #[test]
    fn test_unparseable_price_skips_row() {
        let body = r#"{
            "data": [
                {"price": {"grandTotal": "abc", "currency": "BRL"}, "itineraries": []},
                {"price": {"grandTotal": "100.00", "currency": "BRL"}, "itineraries": []}
            ]
        }"#;
        let offers = interpret_offers_response(StatusCode::OK, body).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].total_price, 100.0);
    }
}
