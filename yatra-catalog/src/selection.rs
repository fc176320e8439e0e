use serde::{Deserialize, Serialize};
use yatra_shared::{CityId, RoomId};

use crate::product::TransportOption;

/// A chosen room type in one city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSelection {
    pub city_id: CityId,
    pub room_id: RoomId,
    pub extra_bed: bool,
}

impl RoomSelection {
    pub fn key(&self) -> (CityId, RoomId) {
        (self.city_id, self.room_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomOptions {
    pub extra_bed: bool,
}

impl RoomOptions {
    pub fn with_extra_bed() -> Self {
        Self { extra_bed: true }
    }
}

/// The chosen vehicle, sized for the party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSelection {
    #[serde(flatten)]
    pub option: TransportOption,
    pub vehicles_needed: u32,
    /// Daily cost for all vehicles; the journey length is applied at pricing.
    pub total_cost: i64,
}

impl TransportSelection {
    pub fn new(option: TransportOption, travellers: u32) -> Self {
        let vehicles_needed = option.vehicles_needed(travellers);
        let total_cost = option.price_per_day.saturating_mul(i64::from(vehicles_needed));
        Self {
            option,
            vehicles_needed,
            total_cost,
        }
    }
}
