//! Maps loosely shaped backend records onto the typed catalog.
//!
//! Every function here is total: absent fields become defaults, records that
//! cannot be used (no id, negative transport price) are dropped with a
//! warning, and nothing returns an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use yatra_core::Destination;
use yatra_shared::models::{
    CategoriesResponse, CitiesResponse, HotelListingResponse, RawBookingDetails, RawCategory,
    RawCity, RawHotel, RawRoom, RawSightseeing, RawTransport,
};
use yatra_shared::{CityId, HotelId, RoomId, SightseeingId, TransportId};

use crate::inventory::{CityInventory, Inventory};
use crate::product::{CitySuggestion, HotelOffer, RoomOffer, SightseeingItem, TransportOption};

/// A destination with no matching city in the backend payload. It has no
/// inventory and cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedDestination {
    pub city_id: CityId,
    pub city_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedInventory {
    pub inventory: Inventory,
    pub transport: Vec<TransportOption>,
    pub unresolved: Vec<UnresolvedDestination>,
}

/// Hotels of one city as listed by `/change-hotel`, plus the category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelListing {
    pub city_id: CityId,
    pub hotels: Vec<HotelOffer>,
    pub categories: Vec<String>,
}

impl HotelListing {
    pub fn empty(city_id: CityId) -> Self {
        Self {
            city_id,
            hotels: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn hotel(&self, hotel_id: HotelId) -> Option<&HotelOffer> {
        self.hotels.iter().find(|h| h.hotel_id == Some(hotel_id))
    }
}

/// Hotel identity inherited by rooms that do not carry their own.
#[derive(Debug, Clone, Default)]
struct HotelContext {
    hotel_id: Option<i64>,
    hotel_name: Option<String>,
    address: Option<String>,
}

/// The single place a room's id is resolved.
pub fn canonical_room_id(raw: &RawRoom) -> Option<RoomId> {
    raw.room_id.or(raw.room_id_alt).or(raw.id).map(RoomId)
}

/// Builds the per-city inventory for a trip's destinations.
///
/// Cities are matched by exact id first, then by case-insensitive name.
/// Destinations without a match end up in `unresolved`.
pub fn normalize_booking(
    destinations: &[Destination],
    details: &RawBookingDetails,
) -> NormalizedInventory {
    let mut cities: Vec<CityInventory> = Vec::with_capacity(destinations.len());
    let mut unresolved = Vec::new();

    for destination in destinations {
        let Some(raw) = match_city(destination, &details.cities) else {
            tracing::warn!(
                city_id = %destination.city_id,
                city = %destination.city_name,
                "No inventory returned for destination"
            );
            unresolved.push(UnresolvedDestination {
                city_id: destination.city_id,
                city_name: destination.city_name.clone(),
            });
            continue;
        };

        if let Some(existing) = cities.iter_mut().find(|c| c.city_id == destination.city_id) {
            tracing::debug!(
                city_id = %destination.city_id,
                "Destination repeats a city, merging nights"
            );
            existing.nights = existing.nights.saturating_add(destination.nights);
            continue;
        }

        let mut city = CityInventory::new(
            destination.city_id,
            destination.city_name.clone(),
            destination.nights,
        );
        city.hotels = normalize_city_hotels(destination.city_id, raw);
        cities.push(city);
    }

    NormalizedInventory {
        inventory: Inventory::new(cities),
        transport: normalize_transport(details.transport.as_ref()),
        unresolved,
    }
}

fn match_city<'a>(destination: &Destination, cities: &'a [RawCity]) -> Option<&'a RawCity> {
    let wanted = destination.city_id.get();
    cities
        .iter()
        .find(|city| city.backend_id() == Some(wanted))
        .or_else(|| {
            let name = destination.city_name.trim();
            cities.iter().find(|city| {
                city.display_name()
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            })
        })
}

fn normalize_city_hotels(city_id: CityId, raw: &RawCity) -> Vec<HotelOffer> {
    let context = HotelContext {
        hotel_id: raw.hotel_id,
        hotel_name: non_blank(raw.hotel_name.as_deref()),
        address: None,
    };
    let flat = if raw.hotel.is_empty() { &raw.rooms } else { &raw.hotel };

    let mut seen = HashSet::new();
    let mut hotels = group_flat_rooms(city_id, flat, &context, &mut seen);
    for hotel in &raw.hotels {
        hotels.push(hotel_offer(city_id, hotel, &mut seen));
    }
    hotels
}

/// Groups rooms that carry their own hotel fields into hotels, keeping the
/// order in which each hotel first appears.
fn group_flat_rooms(
    city_id: CityId,
    rooms: &[RawRoom],
    context: &HotelContext,
    seen: &mut HashSet<RoomId>,
) -> Vec<HotelOffer> {
    let mut hotels: Vec<HotelOffer> = Vec::new();

    for raw in rooms {
        let Some(room) = room_offer(city_id, raw, context, seen) else {
            continue;
        };
        match hotels.iter_mut().find(|h| h.hotel_id == room.hotel_id) {
            Some(hotel) => {
                if hotel.hotel_name.is_none() {
                    hotel.hotel_name = room.hotel_name.clone();
                }
                hotel.rooms.push(room);
            }
            None => hotels.push(HotelOffer {
                hotel_id: room.hotel_id,
                hotel_name: room.hotel_name.clone(),
                address: room.address.clone(),
                category_name: non_blank(raw.hotel_cat_name.as_deref()),
                rooms: vec![room],
            }),
        }
    }
    for hotel in &mut hotels {
        hotel.restamp(city_id);
    }
    hotels
}

fn hotel_offer(city_id: CityId, raw: &RawHotel, seen: &mut HashSet<RoomId>) -> HotelOffer {
    let context = HotelContext {
        hotel_id: raw.backend_id(),
        hotel_name: non_blank(raw.hotel_name.as_deref()),
        address: non_blank(raw.address.as_deref()),
    };
    let rooms = raw
        .rooms
        .iter()
        .filter_map(|room| room_offer(city_id, room, &context, seen))
        .collect();

    HotelOffer {
        hotel_id: context.hotel_id.map(HotelId),
        hotel_name: context.hotel_name,
        address: context.address,
        category_name: non_blank(raw.hotel_cat_name.as_deref()),
        rooms,
    }
}

fn room_offer(
    city_id: CityId,
    raw: &RawRoom,
    context: &HotelContext,
    seen: &mut HashSet<RoomId>,
) -> Option<RoomOffer> {
    let Some(room_id) = canonical_room_id(raw) else {
        tracing::warn!(city_id = %city_id, "Dropping room without an id");
        return None;
    };
    if !seen.insert(room_id) {
        tracing::warn!(city_id = %city_id, room_id = %room_id, "Dropping duplicate room id");
        return None;
    }

    let category_name = non_blank(raw.room_categories_name.as_deref())
        .or_else(|| non_blank(raw.room_name.as_deref()))
        .unwrap_or_default();
    let amenities = raw
        .room_amenities
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();
    let images = raw
        .images
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect();

    Some(RoomOffer {
        room_id,
        category_name,
        amenities,
        images,
        season_rate: rate(raw.season_rate, "season_rate", room_id),
        off_season_rate: rate(raw.off_season_rates, "off_season_rates", room_id),
        season_extra_bed_rate: rate(raw.season_extra_bed, "season_extra_bed", room_id),
        off_season_extra_bed_rate: rate(raw.extra_bed, "extra_bed", room_id),
        hotel_id: raw.hotel_id.or(context.hotel_id).map(HotelId),
        hotel_name: non_blank(raw.hotel_name.as_deref()).or_else(|| context.hotel_name.clone()),
        address: non_blank(raw.address.as_deref()).or_else(|| context.address.clone()),
        city_id,
    })
}

fn rate(value: Option<i64>, field: &'static str, room_id: RoomId) -> i64 {
    match value {
        Some(v) if v < 0 => {
            tracing::warn!(room_id = %room_id, field, value = v, "Clamping negative room rate");
            0
        }
        Some(v) => v,
        None => 0,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn normalize_transport(raw: Option<&RawTransport>) -> Vec<TransportOption> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.options
        .iter()
        .filter_map(|option| {
            let Some(id) = option.id else {
                tracing::warn!("Dropping transport option without an id");
                return None;
            };
            let price_per_day = option.price_per_day.unwrap_or(0);
            if price_per_day < 0 {
                tracing::warn!(
                    transport_id = id,
                    price_per_day,
                    "Rejecting transport option with negative price"
                );
                return None;
            }
            let seating_capacity = option
                .seating_capacity
                .and_then(|c| u32::try_from(c).ok())
                .filter(|c| *c > 0)
                .unwrap_or(1);
            let label = non_blank(option.car_type.as_deref())
                .or_else(|| non_blank(option.name.as_deref()))
                .unwrap_or_else(|| "Vehicle".to_string());

            Some(TransportOption {
                id: TransportId(id),
                label,
                seating_capacity,
                price_per_day,
            })
        })
        .collect()
}

/// Stamps every sightseeing item with the queried city.
pub fn normalize_sightseeing(city_id: CityId, items: &[RawSightseeing]) -> Vec<SightseeingItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|raw| {
            let Some(id) = raw.id else {
                tracing::warn!(city_id = %city_id, "Dropping sightseeing item without an id");
                return None;
            };
            if !seen.insert(id) {
                return None;
            }
            let price = raw.price.or(raw.rate).unwrap_or(0).max(0);
            Some(SightseeingItem {
                id: SightseeingId(id),
                city_id,
                name: non_blank(raw.name.as_deref())
                    .or_else(|| non_blank(raw.title.as_deref()))
                    .unwrap_or_else(|| "Sightseeing".to_string()),
                details: non_blank(raw.sightseeing_details.as_deref())
                    .or_else(|| non_blank(raw.details.as_deref())),
                price,
            })
        })
        .collect()
}

/// Normalizes a hotel list for one city. Rooms nested under a hotel are kept;
/// hotels usually arrive without them.
pub fn normalize_hotel_listing(city_id: CityId, response: &HotelListingResponse) -> HotelListing {
    let mut seen_hotels = HashSet::new();
    let hotels = response
        .hotels
        .iter()
        .filter(|hotel| match hotel.backend_id() {
            Some(id) => seen_hotels.insert(id),
            None => true,
        })
        .map(|hotel| hotel_offer(city_id, hotel, &mut HashSet::new()))
        .collect();

    HotelListing {
        city_id,
        hotels,
        categories: category_names(&response.filters.categories),
    }
}

/// Fills `hotel` with the rooms of a `/change-hotel?hotelId=` response.
pub fn normalize_hotel_rooms(
    city_id: CityId,
    mut hotel: HotelOffer,
    response: &HotelListingResponse,
) -> HotelOffer {
    let context = HotelContext {
        hotel_id: hotel.hotel_id.map(HotelId::get),
        hotel_name: hotel.hotel_name.clone(),
        address: hotel.address.clone(),
    };
    let mut seen = HashSet::new();
    hotel.rooms = response
        .rooms
        .iter()
        .filter_map(|room| room_offer(city_id, room, &context, &mut seen))
        .collect();
    hotel.restamp(city_id);
    hotel
}

pub fn normalize_cities(response: &CitiesResponse) -> Vec<CitySuggestion> {
    response
        .cities
        .iter()
        .filter_map(|raw| {
            Some(CitySuggestion {
                id: CityId(raw.id?),
                name: non_blank(raw.city.as_deref())?,
            })
        })
        .collect()
}

/// Star categories from `/categories`, or `fallback` when the backend sends none.
pub fn normalize_categories(response: &CategoriesResponse, fallback: &[String]) -> Vec<String> {
    let source = if response.categories.is_empty() {
        &response.data
    } else {
        &response.categories
    };
    let names = category_names(source);
    if names.is_empty() {
        fallback.to_vec()
    } else {
        names
    }
}

fn category_names(categories: &[RawCategory]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in categories.iter().filter_map(|c| non_blank(Some(c.name()))) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
