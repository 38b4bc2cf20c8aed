//! Location reference-data lookup
//!
//! Wire model and interpretation for `/v1/reference-data/locations`.
//! Lookup failures degrade to "no matches" instead of raising: a non-success
//! status, or a body that does not decode, yields an empty list (logged).

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use crate::{LocationKind, LocationMatch};

/// Keywords shorter than this never reach the network
pub const MIN_KEYWORD_LEN: usize = 2;

/// Page size requested from the reference-data endpoint
pub const PAGE_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    data: Vec<LocationRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationRow {
    #[serde(default)]
    iata_code: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sub_type: String,
}

/// Turn a locations-endpoint response into sorted matches.
///
/// Airports come before cities, then alphabetical by name. Rows without a
/// usable IATA code or kind are skipped.
pub(crate) fn interpret_locations_response(status: StatusCode, body: &str) -> Vec<LocationMatch> {
    if !status.is_success() {
        warn!(status = %status, "location lookup degraded to no matches");
        return Vec::new();
    }

    let parsed: LocationsResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "location response did not decode, degraded to no matches");
            return Vec::new();
        }
    };

    let mut matches: Vec<LocationMatch> = parsed
        .data
        .into_iter()
        .filter_map(|row| {
            if row.iata_code.is_empty() {
                return None;
            }
            let kind = match row.sub_type.as_str() {
                "AIRPORT" => LocationKind::Airport,
                "CITY" => LocationKind::City,
                _ => return None,
            };
            Some(LocationMatch {
                code: row.iata_code,
                name: row.name,
                kind,
            })
        })
        .collect();

    matches.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    matches
}
