use serde::{Deserialize, Serialize};
use yatra_catalog::{
    HotelOffer, Inventory, InventoryError, PricingInput, RoomOptions, RoomSelection,
    SightseeingItem, TransportOption, TransportSelection,
};
use yatra_core::TripRequest;
use yatra_shared::{CityId, RoomId};

/// The user's in-progress picks: rooms per city, one vehicle, and
/// sightseeing items.
///
/// The store is the single writer of these collections. Every mutation keeps
/// the `(city, room)` and `(item, city)` keys unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    rooms: Vec<RoomSelection>,
    transport: Option<TransportSelection>,
    sightseeing: Vec<SightseeingItem>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects, updates or deselects a room.
    ///
    /// Selecting a room that is already selected only updates its extra-bed
    /// flag. Deselecting never fails, even for unknown rooms.
    pub fn toggle_room(
        &mut self,
        inventory: &Inventory,
        city_id: CityId,
        room_id: RoomId,
        options: RoomOptions,
        checked: bool,
    ) -> Result<(), SelectionError> {
        if !checked {
            self.rooms
                .retain(|selection| selection.key() != (city_id, room_id));
            return Ok(());
        }

        if !inventory.contains_room(city_id, room_id) {
            return Err(SelectionError::UnknownRoom { city_id, room_id });
        }

        match self
            .rooms
            .iter_mut()
            .find(|selection| selection.key() == (city_id, room_id))
        {
            Some(existing) => existing.extra_bed = options.extra_bed,
            None => self.rooms.push(RoomSelection {
                city_id,
                room_id,
                extra_bed: options.extra_bed,
            }),
        }
        Ok(())
    }

    /// Switches the hotel of `city_id`.
    ///
    /// The city's inventory is replaced and every room selection for that city
    /// is removed and returned. No room of the new hotel is selected. Other
    /// cities are left alone. An unknown city changes nothing.
    pub fn change_hotel(
        &mut self,
        inventory: &mut Inventory,
        city_id: CityId,
        hotel: HotelOffer,
    ) -> Result<Vec<RoomSelection>, SelectionError> {
        inventory
            .replace_hotel(city_id, hotel)
            .map_err(|err| match err {
                InventoryError::UnknownCity(id) => SelectionError::UnknownCity(id),
            })?;

        let (removed, kept): (Vec<_>, Vec<_>) = self
            .rooms
            .drain(..)
            .partition(|selection| selection.city_id == city_id);
        self.rooms = kept;

        tracing::info!(
            city_id = %city_id,
            cleared = removed.len(),
            "Hotel changed, room selections cleared"
        );
        Ok(removed)
    }

    /// Replaces the transport pick and sizes the fleet for `travellers`.
    pub fn select_transport(
        &mut self,
        option: TransportOption,
        travellers: u32,
    ) -> &TransportSelection {
        self.transport.insert(TransportSelection::new(option, travellers))
    }

    pub fn clear_transport(&mut self) -> Option<TransportSelection> {
        self.transport.take()
    }

    /// Adds or removes a sightseeing item. Returns whether anything changed.
    pub fn toggle_sightseeing(&mut self, item: SightseeingItem, checked: bool) -> bool {
        let key = item.key();
        if checked {
            if self.sightseeing.iter().any(|s| s.key() == key) {
                return false;
            }
            self.sightseeing.push(item);
            true
        } else {
            let before = self.sightseeing.len();
            self.sightseeing.retain(|s| s.key() != key);
            before != self.sightseeing.len()
        }
    }

    /// Removes and returns room selections that no longer resolve.
    pub fn reconcile(&mut self, inventory: &Inventory) -> Vec<RoomSelection> {
        let (stale, kept): (Vec<_>, Vec<_>) = self
            .rooms
            .drain(..)
            .partition(|s| !inventory.contains_room(s.city_id, s.room_id));
        self.rooms = kept;

        if !stale.is_empty() {
            tracing::warn!(removed = stale.len(), "Removed stale room selections");
        }
        stale
    }

    pub fn rooms(&self) -> &[RoomSelection] {
        &self.rooms
    }

    pub fn rooms_for_city(&self, city_id: CityId) -> Vec<RoomSelection> {
        self.rooms
            .iter()
            .filter(|s| s.city_id == city_id)
            .copied()
            .collect()
    }

    pub fn room(&self, city_id: CityId, room_id: RoomId) -> Option<&RoomSelection> {
        self.rooms.iter().find(|s| s.key() == (city_id, room_id))
    }

    pub fn transport(&self) -> Option<&TransportSelection> {
        self.transport.as_ref()
    }

    pub fn sightseeing(&self) -> &[SightseeingItem] {
        &self.sightseeing
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.transport.is_none() && self.sightseeing.is_empty()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            rooms: self.rooms.clone(),
            transport: self.transport.clone(),
            sightseeing: self.sightseeing.clone(),
        }
    }
}

/// An owned copy of the store, used for pricing and checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    pub rooms: Vec<RoomSelection>,
    pub transport: Option<TransportSelection>,
    pub sightseeing: Vec<SightseeingItem>,
}

impl SelectionSnapshot {
    pub fn rooms_for_city(&self, city_id: CityId) -> Vec<RoomSelection> {
        self.rooms
            .iter()
            .filter(|s| s.city_id == city_id)
            .copied()
            .collect()
    }

    pub fn pricing_input<'a>(
        &'a self,
        trip: &'a TripRequest,
        inventory: &'a Inventory,
    ) -> PricingInput<'a> {
        PricingInput {
            trip,
            inventory,
            transport: self.transport.as_ref(),
            rooms: &self.rooms,
            sightseeing: &self.sightseeing,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Room {room_id} is not offered in city {city_id}")]
    UnknownRoom { city_id: CityId, room_id: RoomId },

    #[error("City not in inventory: {0}")]
    UnknownCity(CityId),
}
