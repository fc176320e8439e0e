use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use yatra_catalog::normalize::{
    normalize_booking, normalize_hotel_listing, normalize_hotel_rooms, normalize_sightseeing,
};
use yatra_catalog::{
    HotelListing, HotelOffer, Inventory, InventoryError, PricedSummary, PricingConfig,
    PricingEngine, RoomOptions, RoomSelection, SightseeingItem, TransportOption,
    TransportSelection, UnresolvedDestination,
};
use yatra_core::{
    BackendError, BackendResult, BookingBackend, HotelQuery, SessionToken, TripRequest,
};
use yatra_order::{
    CheckoutPayload, CheckoutPayloadBuilder, ConfirmedSelection, FetchKind, FetchScope,
    FetchTicket, RequestSequencer, SelectionStore,
};
use yatra_shared::models::{BookingResponse, RawBookingDetails};
use yatra_shared::{CityId, HotelId, RoomId, SightseeingId, TransportId};

use crate::error::{SessionError, SessionResult};

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub pricing: PricingConfig,
    pub fallback_categories: Vec<String>,
}

impl SessionSettings {
    pub fn from_config(config: &yatra_store::Config) -> Self {
        Self {
            pricing: config.pricing.clone(),
            fallback_categories: config.catalog.fallback_categories.clone(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            fallback_categories: yatra_store::CatalogConfig::default().fallback_categories,
        }
    }
}

/// The result of a detached fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub ticket: FetchTicket,
    pub result: BackendResult<T>,
}

/// A hotel list request that runs without borrowing the session.
pub struct PendingHotelSearch {
    ticket: FetchTicket,
    backend: Arc<dyn BookingBackend>,
    token: Option<SessionToken>,
    query: HotelQuery,
}

impl PendingHotelSearch {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub async fn send(self) -> FetchOutcome<HotelListing> {
        let city_id = self.query.city_id;
        let result = self
            .backend
            .hotels(self.token.as_ref(), &self.query)
            .await
            .map(|response| normalize_hotel_listing(city_id, &response));
        FetchOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// A room list request for one hotel.
pub struct PendingRoomFetch {
    ticket: FetchTicket,
    backend: Arc<dyn BookingBackend>,
    token: Option<SessionToken>,
    hotel: HotelOffer,
    query: HotelQuery,
}

impl PendingRoomFetch {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub async fn send(self) -> FetchOutcome<HotelOffer> {
        let city_id = self.query.city_id;
        let hotel = self.hotel;
        let result = self
            .backend
            .hotels(self.token.as_ref(), &self.query)
            .await
            .map(|response| normalize_hotel_rooms(city_id, hotel, &response));
        FetchOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

pub struct PendingSightseeingFetch {
    ticket: FetchTicket,
    backend: Arc<dyn BookingBackend>,
    token: Option<SessionToken>,
}

impl PendingSightseeingFetch {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub async fn send(self) -> FetchOutcome<Vec<SightseeingItem>> {
        let city_id = self.ticket.scope.city_id;
        let result = self
            .backend
            .sightseeing(self.token.as_ref(), city_id)
            .await
            .map(|response| normalize_sightseeing(city_id, &response.into_items()));
        FetchOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// What the user confirmed: the handoff payload and the priced selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub payload: CheckoutPayload,
    pub selection: ConfirmedSelection,
}

/// State of one booking flow, from a submitted trip request to confirmation.
///
/// Selections are rejected until [`BookingSession::load_inventory`] has
/// completed once. Dropping the session discards everything.
pub struct BookingSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    trip: TripRequest,
    backend: Arc<dyn BookingBackend>,
    token: Option<SessionToken>,
    settings: SessionSettings,
    pricing: PricingEngine,
    inventory: Option<Inventory>,
    transport_options: Vec<TransportOption>,
    unresolved: Vec<UnresolvedDestination>,
    selections: SelectionStore,
    sequencer: RequestSequencer,
    hotel_listings: HashMap<CityId, HotelListing>,
    sightseeing: HashMap<CityId, Vec<SightseeingItem>>,
}

impl BookingSession {
    pub fn new(
        trip: TripRequest,
        backend: Arc<dyn BookingBackend>,
        settings: SessionSettings,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(
            session_id = %id,
            destinations = trip.destinations.len(),
            travellers = trip.traveller_count(),
            "Booking session created"
        );

        Self {
            id,
            created_at: Utc::now(),
            pricing: PricingEngine::new(settings.pricing.clone()),
            trip,
            backend,
            token: None,
            settings,
            inventory: None,
            transport_options: Vec::new(),
            unresolved: Vec::new(),
            selections: SelectionStore::new(),
            sequencer: RequestSequencer::new(),
            hotel_listings: HashMap::new(),
            sightseeing: HashMap::new(),
        }
    }

    pub fn with_token(mut self, token: SessionToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn trip(&self) -> &TripRequest {
        &self.trip
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: Option<SessionToken>) {
        self.token = token;
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn is_ready(&self) -> bool {
        self.inventory.is_some()
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.inventory.as_ref()
    }

    pub fn transport_options(&self) -> &[TransportOption] {
        &self.transport_options
    }

    /// Destinations the backend had no inventory for.
    pub fn unresolved(&self) -> &[UnresolvedDestination] {
        &self.unresolved
    }

    pub fn selections(&self) -> &SelectionStore {
        &self.selections
    }

    pub fn hotel_listing(&self, city_id: CityId) -> Option<&HotelListing> {
        self.hotel_listings.get(&city_id)
    }

    pub fn sightseeing_catalog(&self, city_id: CityId) -> &[SightseeingItem] {
        self.sightseeing
            .get(&city_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Fetches the trip's inventory and replaces the current one wholesale.
    ///
    /// On failure an empty inventory is installed so pricing keeps working,
    /// and the error is returned. An auth failure also drops the token.
    pub async fn load_inventory(&mut self) -> SessionResult<&[UnresolvedDestination]> {
        let form = self.trip.to_form();
        let result = self
            .backend
            .booking_details(self.token.as_ref(), &form)
            .await
            .and_then(booking_details);

        let details = match result {
            Ok(details) => details,
            Err(err) => {
                tracing::warn!(session_id = %self.id, error = %err, "Inventory load failed");
                self.install_inventory(Inventory::empty(), Vec::new(), Vec::new());
                return Err(self.backend_failure(err));
            }
        };

        let normalized = normalize_booking(&self.trip.destinations, &details);
        tracing::info!(
            session_id = %self.id,
            cities = normalized.inventory.cities().len(),
            transport_options = normalized.transport.len(),
            unresolved = normalized.unresolved.len(),
            "Inventory loaded"
        );
        self.install_inventory(normalized.inventory, normalized.transport, normalized.unresolved);
        Ok(&self.unresolved)
    }

    fn install_inventory(
        &mut self,
        inventory: Inventory,
        transport: Vec<TransportOption>,
        unresolved: Vec<UnresolvedDestination>,
    ) {
        self.selections.reconcile(&inventory);
        let transport_withdrawn = self
            .selections
            .transport()
            .is_some_and(|selected| !transport.iter().any(|o| o.id == selected.option.id));
        if transport_withdrawn {
            self.selections.clear_transport();
        }

        self.inventory = Some(inventory);
        self.transport_options = transport;
        self.unresolved = unresolved;
        self.hotel_listings.clear();
    }

    fn backend_failure(&mut self, err: BackendError) -> SessionError {
        if err.is_unauthorized() {
            tracing::info!(session_id = %self.id, "Session token rejected, clearing it");
            self.token = None;
        }
        err.into()
    }

    fn ready_inventory(&self) -> SessionResult<&Inventory> {
        self.inventory.as_ref().ok_or(SessionError::InventoryNotReady)
    }

    fn ensure_city(&self, city_id: CityId) -> SessionResult<()> {
        if self.ready_inventory()?.city(city_id).is_none() {
            return Err(InventoryError::UnknownCity(city_id).into());
        }
        Ok(())
    }

    pub fn toggle_room(
        &mut self,
        city_id: CityId,
        room_id: RoomId,
        options: RoomOptions,
        checked: bool,
    ) -> SessionResult<()> {
        let inventory = self.inventory.as_ref().ok_or(SessionError::InventoryNotReady)?;
        self.selections
            .toggle_room(inventory, city_id, room_id, options, checked)?;
        Ok(())
    }

    pub fn select_transport(
        &mut self,
        option_id: TransportId,
    ) -> SessionResult<&TransportSelection> {
        self.ready_inventory()?;
        let option = self
            .transport_options
            .iter()
            .find(|o| o.id == option_id)
            .cloned()
            .ok_or(SessionError::UnknownTransport(option_id))?;

        let travellers = self.trip.traveller_count();
        Ok(self.selections.select_transport(option, travellers))
    }

    pub fn clear_transport(&mut self) -> SessionResult<()> {
        self.ready_inventory()?;
        self.selections.clear_transport();
        Ok(())
    }

    /// Adds or removes a sightseeing item of `city_id`. Adding requires the
    /// item to be in the city's loaded catalog.
    pub fn toggle_sightseeing(
        &mut self,
        city_id: CityId,
        item_id: SightseeingId,
        checked: bool,
    ) -> SessionResult<bool> {
        self.ready_inventory()?;
        let key = (item_id, city_id);
        let item = self
            .sightseeing_catalog(city_id)
            .iter()
            .chain(self.selections.sightseeing())
            .find(|item| item.key() == key)
            .cloned();

        match item {
            Some(item) => Ok(self.selections.toggle_sightseeing(item, checked)),
            None if checked => Err(SessionError::UnknownSightseeing { city_id, item_id }),
            None => Ok(false),
        }
    }

    pub fn begin_hotel_search(
        &mut self,
        city_id: CityId,
        category: Option<&str>,
    ) -> SessionResult<PendingHotelSearch> {
        self.ensure_city(city_id)?;
        let mut query = HotelQuery::hotels_in(city_id);
        if let Some(category) = category {
            query = query.with_category(category);
        }
        Ok(PendingHotelSearch {
            ticket: self.sequencer.issue(FetchScope::new(city_id, FetchKind::Hotels)),
            backend: Arc::clone(&self.backend),
            token: self.token.clone(),
            query,
        })
    }

    /// Stores a hotel list if its fetch is still the latest for the city.
    /// Returns `None` for superseded results, which are discarded.
    pub fn finish_hotel_search(
        &mut self,
        outcome: FetchOutcome<HotelListing>,
    ) -> SessionResult<Option<&HotelListing>> {
        let city_id = outcome.ticket.scope.city_id;
        if !self.sequencer.complete(&outcome.ticket) {
            return Ok(None);
        }

        match outcome.result {
            Ok(listing) => {
                tracing::debug!(
                    city_id = %city_id,
                    hotels = listing.hotels.len(),
                    "Hotel list loaded"
                );
                self.hotel_listings.insert(city_id, listing);
                Ok(self.hotel_listings.get(&city_id))
            }
            Err(err) => {
                self.hotel_listings.insert(city_id, HotelListing::empty(city_id));
                Err(self.backend_failure(err))
            }
        }
    }

    pub async fn search_hotels(
        &mut self,
        city_id: CityId,
        category: Option<&str>,
    ) -> SessionResult<&HotelListing> {
        let pending = self.begin_hotel_search(city_id, category)?;
        let outcome = pending.send().await;
        self.finish_hotel_search(outcome)?;
        self.hotel_listings
            .get(&city_id)
            .ok_or(SessionError::InventoryNotReady)
    }

    /// Starts fetching the rooms of a listed hotel.
    pub fn begin_room_fetch(
        &mut self,
        city_id: CityId,
        hotel_id: HotelId,
    ) -> SessionResult<PendingRoomFetch> {
        self.ensure_city(city_id)?;
        let hotel = self.listed_hotel(city_id, hotel_id)?;
        Ok(PendingRoomFetch {
            ticket: self.sequencer.issue(FetchScope::new(city_id, FetchKind::Rooms)),
            backend: Arc::clone(&self.backend),
            token: self.token.clone(),
            hotel,
            query: HotelQuery::rooms_of(city_id, hotel_id),
        })
    }

    /// Switches the city's hotel if the fetch is still current. Returns the
    /// room selections that were cleared, or `None` for a superseded result.
    pub fn finish_room_fetch(
        &mut self,
        outcome: FetchOutcome<HotelOffer>,
    ) -> SessionResult<Option<Vec<RoomSelection>>> {
        let city_id = outcome.ticket.scope.city_id;
        if !self.sequencer.complete(&outcome.ticket) {
            return Ok(None);
        }

        let hotel = outcome.result.map_err(|err| self.backend_failure(err))?;
        self.apply_hotel(city_id, hotel).map(Some)
    }

    /// Replaces the hotel of `city_id` with a hotel from its listing. Rooms
    /// are fetched when the listing carries none. No room is pre-selected.
    pub async fn change_hotel(
        &mut self,
        city_id: CityId,
        hotel_id: HotelId,
    ) -> SessionResult<Vec<RoomSelection>> {
        self.ensure_city(city_id)?;
        let hotel = self.listed_hotel(city_id, hotel_id)?;

        if !hotel.rooms.is_empty() {
            // Supersede any room fetch still in flight for this city.
            let ticket = self.sequencer.issue(FetchScope::new(city_id, FetchKind::Rooms));
            self.sequencer.complete(&ticket);
            return self.apply_hotel(city_id, hotel);
        }

        let pending = self.begin_room_fetch(city_id, hotel_id)?;
        let outcome = pending.send().await;
        Ok(self.finish_room_fetch(outcome)?.unwrap_or_default())
    }

    fn listed_hotel(&self, city_id: CityId, hotel_id: HotelId) -> SessionResult<HotelOffer> {
        self.hotel_listings
            .get(&city_id)
            .and_then(|listing| listing.hotel(hotel_id))
            .cloned()
            .ok_or(SessionError::UnknownHotel { city_id, hotel_id })
    }

    fn apply_hotel(
        &mut self,
        city_id: CityId,
        hotel: HotelOffer,
    ) -> SessionResult<Vec<RoomSelection>> {
        let inventory = self.inventory.as_mut().ok_or(SessionError::InventoryNotReady)?;
        Ok(self.selections.change_hotel(inventory, city_id, hotel)?)
    }

    pub fn begin_sightseeing_fetch(
        &mut self,
        city_id: CityId,
    ) -> SessionResult<PendingSightseeingFetch> {
        self.ensure_city(city_id)?;
        Ok(PendingSightseeingFetch {
            ticket: self
                .sequencer
                .issue(FetchScope::new(city_id, FetchKind::Sightseeing)),
            backend: Arc::clone(&self.backend),
            token: self.token.clone(),
        })
    }

    /// Stores a sightseeing catalog if its fetch is still current. A failed
    /// fetch leaves the city with an empty catalog.
    pub fn finish_sightseeing_fetch(
        &mut self,
        outcome: FetchOutcome<Vec<SightseeingItem>>,
    ) -> SessionResult<bool> {
        let city_id = outcome.ticket.scope.city_id;
        if !self.sequencer.complete(&outcome.ticket) {
            return Ok(false);
        }

        match outcome.result {
            Ok(items) => {
                tracing::debug!(city_id = %city_id, items = items.len(), "Sightseeing loaded");
                self.sightseeing.insert(city_id, items);
                Ok(true)
            }
            Err(err) => {
                self.sightseeing.insert(city_id, Vec::new());
                Err(self.backend_failure(err))
            }
        }
    }

    pub async fn load_sightseeing(&mut self, city_id: CityId) -> SessionResult<&[SightseeingItem]> {
        let pending = self.begin_sightseeing_fetch(city_id)?;
        let outcome = pending.send().await;
        self.finish_sightseeing_fetch(outcome)?;
        Ok(self.sightseeing_catalog(city_id))
    }

    /// Prices the current selections.
    pub fn summary(&self) -> PricedSummary {
        let empty = Inventory::empty();
        let inventory = self.inventory.as_ref().unwrap_or(&empty);
        let snapshot = self.selections.snapshot();
        self.pricing.derive(&snapshot.pricing_input(&self.trip, inventory))
    }

    pub fn checkout(&self) -> CheckoutPayload {
        CheckoutPayloadBuilder::build(&self.trip, &self.selections.snapshot())
    }

    /// Removes stale selections, then prices and packages the result.
    pub fn confirm(&mut self) -> SessionResult<Confirmation> {
        let inventory = self.inventory.as_ref().ok_or(SessionError::InventoryNotReady)?;
        let stale = self.selections.reconcile(inventory);
        if !stale.is_empty() {
            tracing::warn!(
                session_id = %self.id,
                removed = stale.len(),
                "Dropped stale rooms before confirming"
            );
        }

        let snapshot = self.selections.snapshot();
        let summary = self.pricing.derive(&snapshot.pricing_input(&self.trip, inventory));
        let confirmation = Confirmation {
            payload: CheckoutPayloadBuilder::build(&self.trip, &snapshot),
            selection: ConfirmedSelection::from_summary(&summary, &snapshot),
        };

        tracing::info!(
            session_id = %self.id,
            final_total = summary.grand_total,
            rooms = snapshot.rooms.len(),
            "Booking selection confirmed"
        );
        Ok(confirmation)
    }
}

/// `"success": false` on `/booking` is how the backend reports an invalid
/// session.
fn booking_details(response: BookingResponse) -> BackendResult<RawBookingDetails> {
    if response.success == Some(false) {
        return Err(BackendError::Unauthorized);
    }
    Ok(response.booking_details.unwrap_or_else(|| {
        tracing::warn!("Booking response carried no details");
        RawBookingDetails::default()
    }))
}
