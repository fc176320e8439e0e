use serde::{Deserialize, Serialize};
use yatra_shared::{CityId, RoomId};

use crate::product::{HotelOffer, RoomOffer};

/// Hotels and rooms available in one destination city.
///
/// `city_id`, `city_name` and `nights` always come from the trip's
/// destination, never from the backend record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInventory {
    pub city_id: CityId,
    pub city_name: String,
    pub nights: u32,
    pub hotels: Vec<HotelOffer>,
}

impl CityInventory {
    pub fn new(city_id: CityId, city_name: impl Into<String>, nights: u32) -> Self {
        Self {
            city_id,
            city_name: city_name.into(),
            nights,
            hotels: Vec::new(),
        }
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomOffer> {
        self.hotels.iter().flat_map(|hotel| hotel.rooms.iter())
    }

    pub fn room(&self, room_id: RoomId) -> Option<&RoomOffer> {
        self.rooms().find(|room| room.room_id == room_id)
    }
}

/// Per-city inventory for a trip, in itinerary order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    cities: Vec<CityInventory>,
}

impl Inventory {
    pub fn new(cities: Vec<CityInventory>) -> Self {
        Self { cities }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn cities(&self) -> &[CityInventory] {
        &self.cities
    }

    pub fn city(&self, city_id: CityId) -> Option<&CityInventory> {
        self.cities.iter().find(|city| city.city_id == city_id)
    }

    /// Looks a room up by its `(city, room)` pair. Room ids are only unique
    /// within a city, so the bare room id is never enough.
    pub fn resolve_room(&self, city_id: CityId, room_id: RoomId) -> Option<&RoomOffer> {
        self.city(city_id)?.room(room_id)
    }

    pub fn contains_room(&self, city_id: CityId, room_id: RoomId) -> bool {
        self.resolve_room(city_id, room_id).is_some()
    }

    /// Replaces every hotel of `city_id` with `hotel`, re-stamping its rooms
    /// with the hotel identity and the city id.
    pub fn replace_hotel(
        &mut self,
        city_id: CityId,
        mut hotel: HotelOffer,
    ) -> Result<(), InventoryError> {
        let city = self
            .cities
            .iter_mut()
            .find(|city| city.city_id == city_id)
            .ok_or(InventoryError::UnknownCity(city_id))?;

        hotel.restamp(city_id);
        let mut seen = std::collections::HashSet::new();
        hotel.rooms.retain(|room| seen.insert(room.room_id));

        tracing::debug!(
            city_id = %city_id,
            hotel = ?hotel.hotel_name,
            rooms = hotel.rooms.len(),
            "Replacing hotel for city"
        );
        city.hotels = vec![hotel];
        Ok(())
    }

    pub fn total_nights(&self) -> u32 {
        self.cities
            .iter()
            .fold(0u32, |total, city| total.saturating_add(city.nights))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("City not in inventory: {0}")]
    UnknownCity(CityId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use yatra_shared::HotelId;

    fn room(id: i64, city: i64) -> RoomOffer {
        RoomOffer {
            room_id: RoomId(id),
            category_name: format!("Room {}", id),
            amenities: vec![],
            images: vec![],
            season_rate: 5000,
            off_season_rate: 4000,
            season_extra_bed_rate: 1500,
            off_season_extra_bed_rate: 1000,
            hotel_id: Some(HotelId(1)),
            hotel_name: Some("Old Hotel".to_string()),
            address: None,
            city_id: CityId(city),
        }
    }

    fn inventory() -> Inventory {
        let mut jaipur = CityInventory::new(CityId(1), "Jaipur", 3);
        jaipur.hotels.push(HotelOffer {
            hotel_id: Some(HotelId(1)),
            hotel_name: Some("Old Hotel".to_string()),
            address: None,
            category_name: None,
            rooms: vec![room(101, 1), room(102, 1)],
        });
        let mut udaipur = CityInventory::new(CityId(2), "Udaipur", 2);
        udaipur.hotels.push(HotelOffer {
            hotel_id: Some(HotelId(5)),
            hotel_name: Some("Lake View".to_string()),
            address: None,
            category_name: None,
            rooms: vec![room(101, 2)],
        });
        Inventory::new(vec![jaipur, udaipur])
    }

    #[test]
    fn test_resolve_room_keys_on_city() {
        let inventory = inventory();
        assert_eq!(
            inventory.resolve_room(CityId(2), RoomId(101)).map(|r| r.city_id),
            Some(CityId(2))
        );
        assert!(!inventory.contains_room(CityId(2), RoomId(102)));
        assert!(!inventory.contains_room(CityId(9), RoomId(101)));
        assert_eq!(inventory.total_nights(), 5);
    }

    #[test]
    fn test_replace_hotel_restamps_rooms() {
        let mut inventory = inventory();
        let new_hotel = HotelOffer {
            hotel_id: Some(HotelId(7)),
            hotel_name: Some("Palace".to_string()),
            address: Some("MI Road".to_string()),
            category_name: Some("5 Star".to_string()),
            rooms: vec![room(301, 99), room(301, 99)],
        };

        inventory.replace_hotel(CityId(1), new_hotel).unwrap();

        let city = inventory.city(CityId(1)).unwrap();
        assert_eq!(city.hotels.len(), 1);
        let rooms: Vec<&RoomOffer> = city.rooms().collect();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].city_id, CityId(1));
        assert_eq!(rooms[0].hotel_id, Some(HotelId(7)));
        assert_eq!(rooms[0].hotel_name.as_deref(), Some("Palace"));
        assert_eq!(rooms[0].address.as_deref(), Some("MI Road"));
        assert!(!inventory.contains_room(CityId(1), RoomId(101)));
        assert!(inventory.contains_room(CityId(2), RoomId(101)));
    }

    #[test]
    fn test_replace_hotel_unknown_city() {
        let mut inventory = inventory();
        let hotel = HotelOffer {
            hotel_id: None,
            hotel_name: None,
            address: None,
            category_name: None,
            rooms: vec![],
        };
        let result = inventory.replace_hotel(CityId(42), hotel);
        assert!(matches!(result, Err(InventoryError::UnknownCity(CityId(42)))));
    }
}
