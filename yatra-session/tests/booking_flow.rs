mod common;

use std::sync::Arc;

use common::{session, session_with, trip_json, StubBackend};
use serde_json::json;
use yatra_catalog::RoomOptions;
use yatra_core::{BackendError, TripRequest};
use yatra_order::SelectionError;
use yatra_session::SessionError;
use yatra_shared::{CityId, HotelId, RoomId, SightseeingId, TransportId};

const JAIPUR: CityId = CityId(1);
const UDAIPUR: CityId = CityId(2);

#[tokio::test]
async fn test_selections_rejected_until_inventory_loads() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(Arc::clone(&backend));

    assert!(!session.is_ready());
    assert!(matches!(
        session.toggle_room(JAIPUR, RoomId(101), RoomOptions::default(), true),
        Err(SessionError::InventoryNotReady)
    ));
    assert!(matches!(
        session.select_transport(TransportId(1)),
        Err(SessionError::InventoryNotReady)
    ));
    assert!(matches!(
        session.toggle_sightseeing(JAIPUR, SightseeingId(1), true),
        Err(SessionError::InventoryNotReady)
    ));
    assert!(matches!(
        session.confirm(),
        Err(SessionError::InventoryNotReady)
    ));
    assert_eq!(session.summary().grand_total, 0);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_full_flow_prices_and_confirms() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(Arc::clone(&backend));

    let unresolved = session.load_inventory().await.expect("inventory").len();
    assert_eq!(unresolved, 0);
    assert!(session.is_ready());
    assert_eq!(session.transport_options().len(), 2);

    // Udaipur matched by name even though the backend used its own id.
    let inventory = session.inventory().expect("loaded");
    assert!(inventory.contains_room(UDAIPUR, RoomId(101)));
    assert_eq!(
        inventory.city(JAIPUR).map(|c| c.rooms().count()),
        Some(2)
    );

    let transport = session.select_transport(TransportId(1)).expect("transport");
    assert_eq!(transport.vehicles_needed, 2);
    assert_eq!(transport.total_cost, 4000);

    session
        .toggle_room(JAIPUR, RoomId(101), RoomOptions::with_extra_bed(), true)
        .expect("jaipur room");
    session
        .toggle_room(UDAIPUR, RoomId(101), RoomOptions::default(), true)
        .expect("udaipur room");

    let catalog = session.load_sightseeing(JAIPUR).await.expect("sightseeing");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[1].price, 800);
    assert!(session
        .toggle_sightseeing(JAIPUR, SightseeingId(1), true)
        .expect("toggle"));

    // 2025-11-14 is a season departure; 5 nights make a 6 day journey.
    let summary = session.summary();
    assert!(summary.is_season);
    assert_eq!(summary.journey_days, 6);
    assert_eq!(summary.transport_cost, 24000);
    assert_eq!(summary.hotel_cost, 39000 + 12000);
    assert_eq!(summary.sightseeing_total, 1200);
    assert_eq!(summary.grand_total, 76200);
    assert_eq!(summary.hotels.len(), 2);

    let confirmation = session.confirm().expect("confirm");
    assert_eq!(confirmation.selection.totals.final_total, 76200);
    assert_eq!(confirmation.selection.selected_rooms.len(), 2);
    assert_eq!(confirmation.payload.destinations.len(), 2);
    assert_eq!(confirmation.payload.destinations[0].rooms.len(), 1);
    assert!(confirmation.payload.destinations[0].rooms[0].extra_bed);

    let value = serde_json::to_value(&confirmation).unwrap();
    assert_eq!(value["selection"]["totals"]["finalTotal"], 76200);
    assert_eq!(value["selection"]["transport"]["vehiclesNeeded"], 2);
    assert_eq!(value["payload"]["leavingFrom"], "Delhi");
    assert_eq!(value["payload"]["selectedSightseeing"][0]["name"], "Amber Fort");

    assert_eq!(
        backend.calls(),
        vec!["booking:2".to_string(), "site-seeing:1".to_string()]
    );
}

#[tokio::test]
async fn test_unknown_selections_are_rejected() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(backend);
    session.load_inventory().await.expect("inventory");

    assert!(matches!(
        session.toggle_room(JAIPUR, RoomId(999), RoomOptions::default(), true),
        Err(SessionError::Selection(SelectionError::UnknownRoom { .. }))
    ));
    assert!(matches!(
        session.select_transport(TransportId(42)),
        Err(SessionError::UnknownTransport(TransportId(42)))
    ));
    assert!(matches!(
        session.toggle_sightseeing(JAIPUR, SightseeingId(9), true),
        Err(SessionError::UnknownSightseeing { .. })
    ));
    // Deselecting something that was never selected is a no-op.
    session
        .toggle_room(JAIPUR, RoomId(999), RoomOptions::default(), false)
        .expect("deselect");
    assert!(!session
        .toggle_sightseeing(JAIPUR, SightseeingId(9), false)
        .expect("deselect"));
}

#[tokio::test]
async fn test_unresolved_destination_has_no_inventory() {
    let mut form = trip_json();
    form["destinations"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "id": 3, "cityId": 3, "city": "Jodhpur", "nights": 1 }));
    let trip: TripRequest = serde_json::from_value(form).unwrap();

    let mut session = session_with(Arc::new(StubBackend::new()), trip);
    let unresolved = session.load_inventory().await.expect("inventory").to_vec();

    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].city_id, CityId(3));
    assert_eq!(unresolved[0].city_name, "Jodhpur");
    assert!(matches!(
        session.toggle_room(CityId(3), RoomId(101), RoomOptions::default(), true),
        Err(SessionError::Selection(SelectionError::UnknownRoom { .. }))
    ));
    assert!(matches!(
        session.begin_hotel_search(CityId(3), None),
        Err(SessionError::Inventory(_))
    ));
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(Arc::clone(&backend));
    session.set_token(Some("expired-token".into()));

    let err = session.load_inventory().await.unwrap_err();
    assert!(err.is_auth_failure());
    assert!(session.token().is_none());

    // Pricing still works against the empty inventory.
    assert!(session.is_ready());
    assert_eq!(session.summary().grand_total, 0);
    assert!(session.transport_options().is_empty());
}

#[tokio::test]
async fn test_network_failure_keeps_token() {
    let backend = Arc::new(StubBackend {
        fail_booking: Some(503),
        ..StubBackend::new()
    });
    let mut session = session(backend);

    let err = session.load_inventory().await.unwrap_err();
    assert!(matches!(err, SessionError::Backend(BackendError::Network(_))));
    assert!(!err.is_auth_failure());
    assert!(session.token().is_some());
    assert!(matches!(
        session.toggle_room(JAIPUR, RoomId(101), RoomOptions::default(), true),
        Err(SessionError::Selection(SelectionError::UnknownRoom { .. }))
    ));
}

#[tokio::test]
async fn test_reload_drops_withdrawn_selections() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(Arc::clone(&backend));
    session.load_inventory().await.expect("inventory");

    session.select_transport(TransportId(1)).expect("transport");
    session
        .toggle_room(JAIPUR, RoomId(101), RoomOptions::default(), true)
        .expect("room 101");
    session
        .toggle_room(JAIPUR, RoomId(102), RoomOptions::default(), true)
        .expect("room 102");

    let mut reduced = common::booking_json();
    let details = &mut reduced["bookingDetails"];
    details["transport"]["options"] = json!([
        { "id": 2, "car_type": "Tempo Traveller", "price_per_day": 5000, "seating_capacity": 12 }
    ]);
    details["cities"][0]["hotel"]
        .as_array_mut()
        .unwrap()
        .truncate(1);
    backend.set_booking(reduced);

    session.load_inventory().await.expect("reload");

    let rooms: Vec<RoomId> = session.selections().rooms().iter().map(|s| s.room_id).collect();
    assert_eq!(rooms, vec![RoomId(101)]);
    assert!(session.selections().transport().is_none());
}

#[tokio::test]
async fn test_change_hotel_fetches_rooms_and_clears_city() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(Arc::clone(&backend));
    session.load_inventory().await.expect("inventory");

    session
        .toggle_room(JAIPUR, RoomId(101), RoomOptions::default(), true)
        .expect("jaipur room");
    session
        .toggle_room(UDAIPUR, RoomId(101), RoomOptions::default(), true)
        .expect("udaipur room");

    let listing = session.search_hotels(JAIPUR, None).await.expect("listing");
    assert_eq!(listing.hotels.len(), 2);
    assert_eq!(listing.categories, vec!["5 Star".to_string(), "3 Star".to_string()]);

    let cleared = session.change_hotel(JAIPUR, HotelId(30)).await.expect("change");
    assert_eq!(cleared.len(), 1);
    assert_eq!(cleared[0].room_id, RoomId(101));
    assert!(backend.calls().contains(&"change-hotel:1:30".to_string()));

    // The new hotel's room 101 is a different room and is not pre-selected.
    assert!(session.selections().room(JAIPUR, RoomId(101)).is_none());
    assert!(session.selections().room(UDAIPUR, RoomId(101)).is_some());

    let city = session.inventory().and_then(|i| i.city(JAIPUR)).expect("city");
    assert_eq!(city.hotels.len(), 1);
    assert_eq!(city.hotels[0].hotel_name.as_deref(), Some("Rambagh"));
    let suite = city.room(RoomId(105)).expect("suite");
    assert_eq!(suite.season_rate, 15000);
    assert_eq!(suite.hotel_id, Some(HotelId(30)));

    assert_eq!(session.summary().hotel_cost, 12000);
}

#[tokio::test]
async fn test_change_hotel_uses_listed_rooms() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(Arc::clone(&backend));
    session.load_inventory().await.expect("inventory");
    session.search_hotels(JAIPUR, None).await.expect("listing");

    let cleared = session.change_hotel(JAIPUR, HotelId(31)).await.expect("change");
    assert!(cleared.is_empty());
    assert!(!backend.calls().iter().any(|c| c == "change-hotel:1:31"));
    assert!(session
        .inventory()
        .expect("loaded")
        .contains_room(JAIPUR, RoomId(7)));

    assert!(matches!(
        session.change_hotel(JAIPUR, HotelId(77)).await,
        Err(SessionError::UnknownHotel { .. })
    ));
}

#[tokio::test]
async fn test_superseded_hotel_search_is_discarded() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(backend);
    session.load_inventory().await.expect("inventory");

    let first = session.begin_hotel_search(JAIPUR, Some("5 Star")).expect("first");
    let second = session.begin_hotel_search(JAIPUR, Some("3 Star")).expect("second");

    let first = first.send().await;
    let second = second.send().await;

    // The later request answers first and wins.
    let stored = session
        .finish_hotel_search(second)
        .expect("second result")
        .map(|listing| listing.hotels.len());
    assert_eq!(stored, Some(1));

    let stale = session.finish_hotel_search(first).expect("first result");
    assert!(stale.is_none());

    let listing = session.hotel_listing(JAIPUR).expect("listing");
    assert!(listing.hotel(HotelId(31)).is_some());
    assert!(listing.hotel(HotelId(30)).is_none());
}

#[tokio::test]
async fn test_superseded_room_fetch_does_not_switch_hotel() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(backend);
    session.load_inventory().await.expect("inventory");
    session.search_hotels(JAIPUR, None).await.expect("listing");

    let slow = session.begin_room_fetch(JAIPUR, HotelId(30)).expect("fetch");
    session.change_hotel(JAIPUR, HotelId(31)).await.expect("change");

    let outcome = slow.send().await;
    assert!(session.finish_room_fetch(outcome).expect("finish").is_none());

    let city = session.inventory().and_then(|i| i.city(JAIPUR)).expect("city");
    assert_eq!(city.hotels[0].hotel_name.as_deref(), Some("Haveli"));
}

#[tokio::test]
async fn test_failed_sightseeing_leaves_empty_catalog() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(backend);
    session.load_inventory().await.expect("inventory");

    let err = session.load_sightseeing(UDAIPUR).await.unwrap_err();
    assert!(matches!(err, SessionError::Backend(BackendError::Status(500))));
    assert!(session.sightseeing_catalog(UDAIPUR).is_empty());
    assert!(session.token().is_some());
}

#[tokio::test]
async fn test_sightseeing_toggle_is_idempotent() {
    let backend = Arc::new(StubBackend::new());
    let mut session = session(backend);
    session.load_inventory().await.expect("inventory");
    session.load_sightseeing(JAIPUR).await.expect("sightseeing");

    assert!(session.toggle_sightseeing(JAIPUR, SightseeingId(2), true).unwrap());
    assert!(!session.toggle_sightseeing(JAIPUR, SightseeingId(2), true).unwrap());
    assert_eq!(session.selections().sightseeing().len(), 1);

    assert!(session.toggle_sightseeing(JAIPUR, SightseeingId(2), false).unwrap());
    assert!(session.selections().sightseeing().is_empty());
}
