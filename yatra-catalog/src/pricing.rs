use serde::{Deserialize, Serialize};
use yatra_core::TripRequest;
use yatra_shared::{CityId, HotelId, RoomId, SightseeingId, TransportId};

use crate::inventory::Inventory;
use crate::product::SightseeingItem;
use crate::selection::{RoomSelection, TransportSelection};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Currency code attached to every summary. Amounts are whole units.
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
        }
    }
}

/// Everything a price derivation reads. Nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub trip: &'a TripRequest,
    pub inventory: &'a Inventory,
    pub transport: Option<&'a TransportSelection>,
    pub rooms: &'a [RoomSelection],
    pub sightseeing: &'a [SightseeingItem],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportLine {
    pub id: TransportId,
    pub label: String,
    pub price_per_day: i64,
    pub seating_capacity: u32,
    pub vehicles_needed: u32,
    pub journey_days: u32,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLine {
    pub city_id: CityId,
    pub city_name: String,
    pub room_id: RoomId,
    pub hotel_id: Option<HotelId>,
    pub category_name: String,
    pub extra_bed: bool,
    pub nights: u32,
    pub rooms: u32,
    pub base_rate: i64,
    pub extra_bed_rate: i64,
    /// `base_rate × nights × rooms`
    pub base_total: i64,
    /// `extra_bed_rate × nights × rooms`, zero without an extra bed.
    pub extra_bed_total: i64,
    pub line_total: i64,
}

/// Room lines of one hotel. Presentation only; totals never depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelGroup {
    pub key: String,
    pub hotel_name: Option<String>,
    pub address: Option<String>,
    pub subtotal: i64,
    pub rooms: Vec<RoomLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightseeingLine {
    pub id: SightseeingId,
    pub city_id: CityId,
    pub name: String,
    pub price: i64,
}

/// A room selection that no longer resolves against the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedSelection {
    pub city_id: CityId,
    pub room_id: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedSummary {
    pub currency: String,
    pub is_season: bool,
    pub journey_days: u32,
    pub travellers: u32,
    pub transport: Option<TransportLine>,
    pub transport_cost: i64,
    pub hotels: Vec<HotelGroup>,
    pub hotel_cost: i64,
    pub sightseeing: Vec<SightseeingLine>,
    pub sightseeing_total: i64,
    pub grand_total: i64,
    pub dropped_selections: Vec<DroppedSelection>,
}

impl PricedSummary {
    pub fn room_lines(&self) -> impl Iterator<Item = &RoomLine> {
        self.hotels.iter().flat_map(|group| group.rooms.iter())
    }
}

/// Derives trip prices from the trip, its inventory and the current picks.
///
/// Derivation is pure and never fails: selections that do not resolve are
/// reported in `dropped_selections` and left out of every total.
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn derive(&self, input: &PricingInput<'_>) -> PricedSummary {
        let trip = input.trip;
        let is_season = trip.is_season_travel();
        let journey_days = trip.journey_days();

        let transport = input
            .transport
            .map(|selection| Self::transport_line(selection, journey_days));
        let transport_cost = transport.as_ref().map_or(0, |line| line.total);

        let (hotels, dropped_selections) = self.hotel_groups(input, is_season);
        let hotel_cost = saturating_sum(hotels.iter().map(|group| group.subtotal));

        let sightseeing: Vec<SightseeingLine> = input
            .sightseeing
            .iter()
            .map(|item| SightseeingLine {
                id: item.id,
                city_id: item.city_id,
                name: item.name.clone(),
                price: item.price,
            })
            .collect();
        let sightseeing_total = saturating_sum(sightseeing.iter().map(|line| line.price));

        if !dropped_selections.is_empty() {
            tracing::debug!(
                dropped = dropped_selections.len(),
                "Ignoring room selections missing from inventory"
            );
        }

        PricedSummary {
            currency: self.config.currency.clone(),
            is_season,
            journey_days,
            travellers: trip.traveller_count(),
            transport,
            transport_cost,
            hotels,
            hotel_cost,
            sightseeing,
            sightseeing_total,
            grand_total: saturating_sum([transport_cost, hotel_cost, sightseeing_total]),
            dropped_selections,
        }
    }

    pub fn transport_line(selection: &TransportSelection, journey_days: u32) -> TransportLine {
        let option = &selection.option;
        TransportLine {
            id: option.id,
            label: option.label.clone(),
            price_per_day: option.price_per_day,
            seating_capacity: option.seating_capacity,
            vehicles_needed: selection.vehicles_needed,
            journey_days,
            total: option
                .price_per_day
                .saturating_mul(i64::from(journey_days))
                .saturating_mul(i64::from(selection.vehicles_needed)),
        }
    }

    fn hotel_groups(
        &self,
        input: &PricingInput<'_>,
        is_season: bool,
    ) -> (Vec<HotelGroup>, Vec<DroppedSelection>) {
        let rooms_per_night = input.trip.room_count;
        let mut groups: Vec<HotelGroup> = Vec::new();
        let mut dropped = Vec::new();

        for selection in input.rooms {
            let resolved = input.inventory.city(selection.city_id).and_then(|city| {
                city.room(selection.room_id).map(|room| (city, room))
            });
            let Some((city, room)) = resolved else {
                dropped.push(DroppedSelection {
                    city_id: selection.city_id,
                    room_id: selection.room_id,
                });
                continue;
            };

            let multiplier = i64::from(city.nights).saturating_mul(i64::from(rooms_per_night));
            let base_rate = room.nightly_rate(is_season);
            let extra_bed_rate = room.extra_bed_rate(is_season);
            let base_total = base_rate.saturating_mul(multiplier);
            let extra_bed_total = if selection.extra_bed {
                extra_bed_rate.saturating_mul(multiplier)
            } else {
                0
            };

            let line = RoomLine {
                city_id: city.city_id,
                city_name: city.city_name.clone(),
                room_id: room.room_id,
                hotel_id: room.hotel_id,
                category_name: room.category_name.clone(),
                extra_bed: selection.extra_bed,
                nights: city.nights,
                rooms: rooms_per_night,
                base_rate,
                extra_bed_rate,
                base_total,
                extra_bed_total,
                line_total: base_total.saturating_add(extra_bed_total),
            };

            let key = room.hotel_key();
            match groups.iter_mut().find(|group| group.key == key) {
                Some(group) => {
                    group.subtotal = group.subtotal.saturating_add(line.line_total);
                    group.rooms.push(line);
                }
                None => groups.push(HotelGroup {
                    key,
                    hotel_name: room.hotel_name.clone(),
                    address: room.address.clone(),
                    subtotal: line.line_total,
                    rooms: vec![line],
                }),
            }
        }

        (groups, dropped)
    }
}

/// Amounts clamp at the i64 bounds instead of wrapping.
fn saturating_sum(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
