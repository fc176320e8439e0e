use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use yatra_catalog::{PricedSummary, RoomSelection, SightseeingItem, TransportSelection};
use yatra_core::trip::{DestinationForm, TravelDetailsForm};
use yatra_core::TripRequest;
use yatra_shared::{CityId, TransportId};

use crate::selection::SelectionSnapshot;

/// A destination of the handoff payload with the rooms picked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDestination {
    #[serde(flatten)]
    pub destination: DestinationForm,
    pub rooms: Vec<RoomSelection>,
}

/// The trip request plus every pick, handed to the confirmation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub destinations: Vec<CheckoutDestination>,
    #[serde(flatten)]
    pub details: TravelDetailsForm,
    pub selected_transport: Option<TransportSelection>,
    pub selected_sightseeing: Vec<SightseeingItem>,
}

pub struct CheckoutPayloadBuilder;

impl CheckoutPayloadBuilder {
    /// Every destination is listed, with an empty `rooms` list when nothing
    /// was picked there.
    pub fn build(trip: &TripRequest, snapshot: &SelectionSnapshot) -> CheckoutPayload {
        let form = trip.to_form();
        let destinations = trip
            .destinations
            .iter()
            .zip(form.destinations)
            .map(|(destination, row)| CheckoutDestination {
                destination: row,
                rooms: snapshot.rooms_for_city(destination.city_id),
            })
            .collect();

        CheckoutPayload {
            destinations,
            details: form.details,
            selected_transport: snapshot.transport.clone(),
            selected_sightseeing: snapshot.sightseeing.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransport {
    pub id: TransportId,
    pub label: String,
    pub seating_capacity: u32,
    pub price_per_day: i64,
    pub vehicles_needed: u32,
    /// Cost for the whole journey.
    pub total_cost: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTotals {
    pub journey_days: u32,
    pub transport_cost: i64,
    pub hotel_cost: i64,
    pub sightseeing_total: i64,
    pub final_total: i64,
    pub travellers: u32,
}

/// Priced selection saved when the user confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedSelection {
    pub transport: Option<ConfirmedTransport>,
    pub selected_rooms: BTreeMap<CityId, Vec<RoomSelection>>,
    pub selected_sightseeing: Vec<SightseeingItem>,
    pub totals: ConfirmedTotals,
}

impl ConfirmedSelection {
    /// Builds the confirmation from a priced summary. Rooms dropped by the
    /// pricing are left out so the saved selection matches the totals.
    pub fn from_summary(summary: &PricedSummary, snapshot: &SelectionSnapshot) -> Self {
        let transport = summary.transport.as_ref().map(|line| ConfirmedTransport {
            id: line.id,
            label: line.label.clone(),
            seating_capacity: line.seating_capacity,
            price_per_day: line.price_per_day,
            vehicles_needed: line.vehicles_needed,
            total_cost: line.total,
        });

        let mut selected_rooms: BTreeMap<CityId, Vec<RoomSelection>> = BTreeMap::new();
        for selection in &snapshot.rooms {
            let dropped = summary
                .dropped_selections
                .iter()
                .any(|d| d.city_id == selection.city_id && d.room_id == selection.room_id);
            if !dropped {
                selected_rooms
                    .entry(selection.city_id)
                    .or_default()
                    .push(*selection);
            }
        }

        Self {
            transport,
            selected_rooms,
            selected_sightseeing: snapshot.sightseeing.clone(),
            totals: ConfirmedTotals {
                journey_days: summary.journey_days,
                transport_cost: summary.transport_cost,
                hotel_cost: summary.hotel_cost,
                sightseeing_total: summary.sightseeing_total,
                final_total: summary.grand_total,
                travellers: summary.travellers,
            },
        }
    }
}
