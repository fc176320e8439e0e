//! Intake form helpers: city autocomplete and handoff parsing.

use yatra_catalog::normalize::normalize_cities;
use yatra_catalog::CitySuggestion;
use yatra_core::{BookingBackend, CoreError, SessionToken, TripRequest, TripRequestForm};

use crate::error::SessionResult;

/// Queries shorter than this are not sent to the backend.
pub const MIN_QUERY_LEN: usize = 2;

pub async fn search_cities(
    backend: &dyn BookingBackend,
    token: Option<&SessionToken>,
    query: &str,
) -> SessionResult<Vec<CitySuggestion>> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Ok(Vec::new());
    }
    let response = backend.search_cities(token, query).await?;
    Ok(normalize_cities(&response))
}

/// Parses and validates a trip request handed off as JSON.
pub fn parse_trip(json: &str) -> SessionResult<TripRequest> {
    let form: TripRequestForm = serde_json::from_str(json).map_err(CoreError::from)?;
    Ok(TripRequest::from_form(form)?)
}

pub fn trip_to_json(trip: &TripRequest) -> SessionResult<String> {
    Ok(serde_json::to_string(trip).map_err(CoreError::from)?)
}
