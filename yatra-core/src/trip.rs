//! The normalized trip request.
//!
//! A `TripRequest` is produced once from the intake form and never mutated
//! afterwards. Everything that prices the trip reads from it: the traveller
//! count, the season, the journey length and the per-night room multiplier.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use yatra_shared::CityId;

use crate::{CoreError, CoreResult};

/// Departure months (October to December) that switch hotels to season rates.
pub const SEASON_MONTHS: RangeInclusive<u32> = 10..=12;

/// Children at or below this age do not occupy a seat or a bed.
pub const MAX_FREE_CHILD_AGE: u32 = 6;

/// Upper bounds the intake form accepts.
pub const MAX_NIGHTS_PER_DESTINATION: u32 = 365;
pub const MAX_TRAVELLERS: u32 = 99;
pub const MAX_ROOMS: u32 = 99;

const OCCUPANTS_PER_ROOM: u32 = 2;

pub fn is_season_month(month: u32) -> bool {
    SEASON_MONTHS.contains(&month)
}

/// Counts travellers who occupy seats and beds.
pub fn count_travellers(adults: u32, child_ages: &[u32]) -> u32 {
    let older_children = child_ages
        .iter()
        .filter(|age| **age > MAX_FREE_CHILD_AGE)
        .count();
    adults.saturating_add(u32::try_from(older_children).unwrap_or(u32::MAX))
}

/// Whether the trip books hotels and transfers or only the land package.
///
/// The intake form exposes this as two radio buttons. Both unset is a
/// legitimate state (the user never touched the control); both set is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    Transfers,
    LandOnly,
    #[default]
    Unset,
}

impl TransferMode {
    pub fn from_flags(add_transfers: bool, land_only: bool) -> CoreResult<Self> {
        match (add_transfers, land_only) {
            (true, false) => Ok(TransferMode::Transfers),
            (false, true) => Ok(TransferMode::LandOnly),
            (false, false) => Ok(TransferMode::Unset),
            (true, true) => Err(CoreError::ValidationError(
                "Choose either transfers or land only, not both.".to_string(),
            )),
        }
    }

    pub fn flags(self) -> (bool, bool) {
        match self {
            TransferMode::Transfers => (true, false),
            TransferMode::LandOnly => (false, true),
            TransferMode::Unset => (false, false),
        }
    }
}

/// One city of the itinerary, in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Identifier the intake form attached to the row, if any.
    pub id: Option<i64>,
    pub city_id: CityId,
    pub city_name: String,
    pub nights: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TripRequestForm", into = "TripRequestForm")]
pub struct TripRequest {
    pub destinations: Vec<Destination>,
    pub origin_city: String,
    pub origin_city_id: Option<CityId>,
    pub nationality: String,
    /// Raw departure date as entered; see [`TripRequest::departure`].
    pub departure_date: String,
    pub adult_count: u32,
    pub child_ages: Vec<u32>,
    /// Rooms booked per selected room type, per night.
    pub room_count: u32,
    pub star_category: String,
    pub transfer_mode: TransferMode,
}

impl TripRequest {
    pub fn from_form(form: TripRequestForm) -> CoreResult<Self> {
        let TripRequestForm {
            destinations,
            details,
        } = form;

        if destinations.is_empty() {
            return Err(invalid("Please add at least one destination."));
        }

        let mut normalized = Vec::with_capacity(destinations.len());
        for row in destinations {
            let city_name = row.city.trim().to_string();
            if city_name.is_empty() {
                return Err(invalid("Please select a city for each destination."));
            }
            if row.nights == 0 {
                return Err(invalid("Please select nights for each destination."));
            }
            if row.nights > MAX_NIGHTS_PER_DESTINATION {
                return Err(invalid(&format!(
                    "A destination can have at most {} nights.",
                    MAX_NIGHTS_PER_DESTINATION
                )));
            }
            let city_id = row.city_id.or(row.id).ok_or_else(|| {
                invalid(&format!("City '{}' was not picked from the list.", city_name))
            })?;

            normalized.push(Destination {
                id: row.id,
                city_id: CityId(city_id),
                city_name,
                nights: row.nights,
            });
        }

        if details.leaving_from.trim().is_empty() {
            return Err(invalid("Please select 'Leaving From' city."));
        }
        if details.leaving_on.trim().is_empty() {
            return Err(invalid("Please choose a leaving date."));
        }

        let transfer_mode = TransferMode::from_flags(details.add_transfers, details.land_only)?;
        let room_count = details.rooms.unwrap_or(0);
        if transfer_mode != TransferMode::LandOnly {
            if details.star_category.trim().is_empty() {
                return Err(invalid("Please choose a star rating."));
            }
            if room_count == 0 {
                return Err(invalid("Please select number of rooms."));
            }
        }
        if room_count > MAX_ROOMS {
            return Err(invalid(&format!("At most {} rooms can be booked.", MAX_ROOMS)));
        }

        let headcount = details
            .adults
            .unwrap_or(0)
            .max(details.travellers.unwrap_or(0));
        if headcount > MAX_TRAVELLERS || details.child_ages.len() > MAX_TRAVELLERS as usize {
            return Err(invalid(&format!(
                "At most {} travellers can be booked.",
                MAX_TRAVELLERS
            )));
        }

        let older_children = count_travellers(0, &details.child_ages);
        let adult_count = match details.adults {
            Some(adults) => adults,
            None => details
                .travellers
                .unwrap_or(0)
                .saturating_sub(older_children),
        };

        let request = Self {
            destinations: normalized,
            origin_city: details.leaving_from.trim().to_string(),
            origin_city_id: details.leaving_from_id.map(CityId),
            nationality: details.nationality,
            departure_date: details.leaving_on.trim().to_string(),
            adult_count,
            child_ages: details.child_ages,
            room_count: room_count.max(1),
            star_category: details.star_category,
            transfer_mode,
        };

        if request.room_count < request.minimum_rooms() {
            tracing::debug!(
                rooms = request.room_count,
                minimum = request.minimum_rooms(),
                "Trip requests fewer rooms than its travellers need"
            );
        }

        Ok(request)
    }

    pub fn to_form(&self) -> TripRequestForm {
        let (add_transfers, land_only) = self.transfer_mode.flags();
        TripRequestForm {
            destinations: self
                .destinations
                .iter()
                .map(|d| DestinationForm {
                    id: d.id,
                    city_id: Some(d.city_id.get()),
                    city: d.city_name.clone(),
                    nights: d.nights,
                })
                .collect(),
            details: TravelDetailsForm {
                leaving_from: self.origin_city.clone(),
                leaving_from_id: self.origin_city_id.map(CityId::get),
                nationality: self.nationality.clone(),
                leaving_on: self.departure_date.clone(),
                travellers: Some(self.traveller_count()),
                adults: Some(self.adult_count),
                children: Some(self.child_ages.len() as u32),
                child_ages: self.child_ages.clone(),
                rooms: Some(self.room_count),
                star_category: self.star_category.clone(),
                add_transfers,
                land_only,
            },
        }
    }

    /// Adults plus children older than six.
    pub fn traveller_count(&self) -> u32 {
        count_travellers(self.adult_count, &self.child_ages)
    }

    /// Parses the departure date. Accepts `YYYY-MM-DD`, RFC 3339 timestamps
    /// and naive `YYYY-MM-DDTHH:MM[:SS]` values.
    pub fn departure(&self) -> Option<NaiveDate> {
        let raw = self.departure_date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
                    .ok()
                    .map(|dt| dt.date())
            })
    }

    pub fn departure_month(&self) -> Option<u32> {
        self.departure().map(|date| date.month())
    }

    /// Missing or unparseable dates price at off-season rates.
    pub fn is_season_travel(&self) -> bool {
        self.departure_month().is_some_and(is_season_month)
    }

    pub fn total_nights(&self) -> u32 {
        self.destinations
            .iter()
            .fold(0u32, |total, d| total.saturating_add(d.nights))
    }

    /// Sum of nights plus the departure day.
    pub fn journey_days(&self) -> u32 {
        self.total_nights().saturating_add(1)
    }

    /// Rooms needed at two occupants per room, never less than one.
    pub fn minimum_rooms(&self) -> u32 {
        self.traveller_count().div_ceil(OCCUPANTS_PER_ROOM).max(1)
    }

    pub fn destination(&self, city_id: CityId) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.city_id == city_id)
    }

    pub fn adds_transfers(&self) -> bool {
        self.transfer_mode == TransferMode::Transfers
    }

    pub fn is_land_only(&self) -> bool {
        self.transfer_mode == TransferMode::LandOnly
    }
}

impl TryFrom<TripRequestForm> for TripRequest {
    type Error = CoreError;

    fn try_from(form: TripRequestForm) -> Result<Self, Self::Error> {
        Self::from_form(form)
    }
}

impl From<TripRequest> for TripRequestForm {
    fn from(request: TripRequest) -> Self {
        request.to_form()
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::ValidationError(message.to_string())
}

/// The intake form as handed off between screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequestForm {
    #[serde(default)]
    pub destinations: Vec<DestinationForm>,
    #[serde(flatten)]
    pub details: TravelDetailsForm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationForm {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<i64>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub nights: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelDetailsForm {
    #[serde(default)]
    pub leaving_from: String,
    #[serde(default)]
    pub leaving_from_id: Option<i64>,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub leaving_on: String,
    #[serde(default)]
    pub travellers: Option<u32>,
    #[serde(default)]
    pub adults: Option<u32>,
    #[serde(default)]
    pub children: Option<u32>,
    #[serde(default)]
    pub child_ages: Vec<u32>,
    #[serde(default)]
    pub rooms: Option<u32>,
    #[serde(default)]
    pub star_category: String,
    #[serde(default)]
    pub add_transfers: bool,
    #[serde(default)]
    pub land_only: bool,
}
