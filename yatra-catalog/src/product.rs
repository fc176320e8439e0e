use serde::{Deserialize, Serialize};
use yatra_shared::{CityId, HotelId, RoomId, SightseeingId, TransportId};

/// A bookable room type inside one hotel of one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOffer {
    pub room_id: RoomId,
    pub category_name: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub season_rate: i64,
    pub off_season_rate: i64,
    pub season_extra_bed_rate: i64,
    pub off_season_extra_bed_rate: i64,
    pub hotel_id: Option<HotelId>,
    pub hotel_name: Option<String>,
    pub address: Option<String>,
    pub city_id: CityId,
}

impl RoomOffer {
    pub fn nightly_rate(&self, is_season: bool) -> i64 {
        if is_season {
            self.season_rate
        } else {
            self.off_season_rate
        }
    }

    pub fn extra_bed_rate(&self, is_season: bool) -> i64 {
        if is_season {
            self.season_extra_bed_rate
        } else {
            self.off_season_extra_bed_rate
        }
    }

    /// Display key used to group priced rooms: hotel name, then hotel id,
    /// then a generic placeholder.
    pub fn hotel_key(&self) -> String {
        match (&self.hotel_name, self.hotel_id) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(id)) => id.to_string(),
            _ => "hotel".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelOffer {
    pub hotel_id: Option<HotelId>,
    pub hotel_name: Option<String>,
    pub address: Option<String>,
    pub category_name: Option<String>,
    pub rooms: Vec<RoomOffer>,
}

impl HotelOffer {
    /// Stamps this hotel's identity and the owning city onto every room, so a
    /// room can be priced without looking at its parent.
    pub fn restamp(&mut self, city_id: CityId) {
        for room in &mut self.rooms {
            room.city_id = city_id;
            room.hotel_id = self.hotel_id;
            room.hotel_name = self.hotel_name.clone();
            if room.address.is_none() {
                room.address = self.address.clone();
            }
        }
    }

    pub fn room(&self, room_id: RoomId) -> Option<&RoomOffer> {
        self.rooms.iter().find(|r| r.room_id == room_id)
    }
}

/// A vehicle type offered for the whole journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOption {
    pub id: TransportId,
    pub label: String,
    /// Always at least one.
    pub seating_capacity: u32,
    pub price_per_day: i64,
}

impl TransportOption {
    /// Vehicles required to seat every traveller. At least one vehicle is
    /// always reserved, even for an empty party.
    pub fn vehicles_needed(&self, travellers: u32) -> u32 {
        if travellers == 0 {
            return 1;
        }
        travellers.div_ceil(self.seating_capacity.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightseeingItem {
    pub id: SightseeingId,
    pub city_id: CityId,
    pub name: String,
    pub details: Option<String>,
    pub price: i64,
}

impl SightseeingItem {
    pub fn key(&self) -> (SightseeingId, CityId) {
        (self.id, self.city_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySuggestion {
    pub id: CityId,
    pub name: String,
}
