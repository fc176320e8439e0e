#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use yatra_core::trip::TripRequestForm;
use yatra_core::{
    BackendError, BackendResult, BookingBackend, HotelQuery, SessionToken, TripRequest,
};
use yatra_session::{BookingSession, SessionSettings};
use yatra_shared::models::{
    AuthResponse, BookingResponse, CategoriesResponse, CitiesResponse, Credentials,
    HotelListingResponse, Registration, SightseeingResponse,
};
use yatra_shared::CityId;

pub const VALID_TOKEN: &str = "valid-token";

/// In-memory backend serving canned JSON, in the shapes the real API uses.
pub struct StubBackend {
    pub booking: Mutex<Value>,
    pub fail_booking: Option<u16>,
    pub hotel_lists: HashMap<(i64, Option<String>), Value>,
    pub hotel_rooms: HashMap<i64, Value>,
    pub sightseeing: HashMap<i64, Value>,
    pub categories: Value,
    pub cities: Value,
    pub calls: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn new() -> Self {
        let mut hotel_lists = HashMap::new();
        hotel_lists.insert(
            (1, None),
            json!({
                "hotels": [
                    { "hotel_id": 30, "hotel_name": "Rambagh", "hotel_cat_name": "5 Star" },
                    { "hotel_id": 31, "hotel_name": "Haveli", "hotel_cat_name": "3 Star",
                      "rooms": [{ "room_id": 7, "room_categories_name": "Courtyard", "season_rate": 2000 }] }
                ],
                "filters": { "categories": [{ "id": 1, "name": "5 Star" }, "3 Star"] }
            }),
        );
        hotel_lists.insert(
            (1, Some("5 Star".to_string())),
            json!({ "hotels": [{ "hotel_id": 30, "hotel_name": "Rambagh" }] }),
        );
        hotel_lists.insert(
            (1, Some("3 Star".to_string())),
            json!({ "hotels": [{ "hotel_id": 31, "hotel_name": "Haveli" }] }),
        );

        let mut hotel_rooms = HashMap::new();
        hotel_rooms.insert(
            30,
            json!({
                "rooms": [
                    { "room_id": 101, "room_categories_name": "Palace Room", "season_rate": 9000,
                      "off_season_rates": 7000, "season_extra_bed": 2000, "extra_bed": 1500 },
                    { "room_id": 105, "room_categories_name": "Suite", "season_rate": "15000" }
                ]
            }),
        );

        let mut sightseeing = HashMap::new();
        sightseeing.insert(
            1,
            json!({
                "success": true,
                "data": [
                    { "id": 1, "name": "Amber Fort", "sightseeing_details": "Half day", "price": 1200 },
                    { "id": 2, "title": "City Palace", "rate": "800" }
                ]
            }),
        );

        Self {
            booking: Mutex::new(booking_json()),
            fail_booking: None,
            hotel_lists,
            hotel_rooms,
            sightseeing,
            categories: json!({
                "success": true,
                "categories": [{ "id": 1, "name": "5 Star" }, { "id": 2, "name": "4 Star" }]
            }),
            cities: json!({
                "cities": [{ "id": 1, "city": "Jaipur" }, { "id": "9", "city": "Jaisalmer" }]
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_booking(&self, booking: Value) {
        if let Ok(mut current) = self.booking.lock() {
            *current = booking;
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn authorized(token: Option<&SessionToken>) -> bool {
        token.is_some_and(|t| t.expose() == VALID_TOKEN)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value) -> BackendResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| BackendError::Malformed(e.to_string()))
}

#[async_trait]
impl BookingBackend for StubBackend {
    async fn categories(&self, token: Option<&SessionToken>) -> BackendResult<CategoriesResponse> {
        self.record("categories".to_string());
        if !Self::authorized(token) {
            return decode(&json!({ "success": false, "message": "Invalid token" }));
        }
        decode(&self.categories)
    }

    async fn search_cities(
        &self,
        _token: Option<&SessionToken>,
        query: &str,
    ) -> BackendResult<CitiesResponse> {
        self.record(format!("cities:{}", query));
        decode(&self.cities)
    }

    async fn booking_details(
        &self,
        token: Option<&SessionToken>,
        form: &TripRequestForm,
    ) -> BackendResult<BookingResponse> {
        self.record(format!("booking:{}", form.destinations.len()));
        if let Some(status) = self.fail_booking {
            return Err(BackendError::Network(format!("connection reset ({})", status)));
        }
        if !Self::authorized(token) {
            return decode(&json!({ "success": false, "message": "Unauthorized" }));
        }
        let booking = self.booking.lock().map(|b| b.clone()).unwrap_or_default();
        decode(&booking)
    }

    async fn hotels(
        &self,
        token: Option<&SessionToken>,
        query: &HotelQuery,
    ) -> BackendResult<HotelListingResponse> {
        if !Self::authorized(token) {
            return Err(BackendError::Unauthorized);
        }
        let city = query.city_id.get();
        match query.hotel_id {
            Some(hotel_id) => {
                self.record(format!("change-hotel:{}:{}", city, hotel_id));
                decode(self.hotel_rooms.get(&hotel_id.get()).unwrap_or(&json!({})))
            }
            None => {
                self.record(format!("change-hotel:{}", city));
                let key = (city, query.category.clone());
                decode(self.hotel_lists.get(&key).unwrap_or(&json!({})))
            }
        }
    }

    async fn sightseeing(
        &self,
        token: Option<&SessionToken>,
        city_id: CityId,
    ) -> BackendResult<SightseeingResponse> {
        self.record(format!("site-seeing:{}", city_id));
        if !Self::authorized(token) {
            return Err(BackendError::Unauthorized);
        }
        match self.sightseeing.get(&city_id.get()) {
            Some(value) => decode(value),
            None => Err(BackendError::Status(500)),
        }
    }

    async fn login(&self, credentials: &Credentials) -> BackendResult<AuthResponse> {
        self.record("login".to_string());
        if credentials.email == "agent@example.com" && credentials.password.expose() == "secret" {
            decode(&json!({ "token": VALID_TOKEN, "id": 17, "message": "Welcome back" }))
        } else {
            decode(&json!({ "message": "Invalid credentials" }))
        }
    }

    async fn register(&self, registration: &Registration) -> BackendResult<AuthResponse> {
        self.record("register".to_string());
        let known: HashSet<&str> = ["agent@example.com"].into_iter().collect();
        if known.contains(registration.email.as_str()) {
            return Err(BackendError::Rejected("Email already registered".to_string()));
        }
        decode(&json!({ "token": VALID_TOKEN, "id": "u-42" }))
    }
}

pub fn booking_json() -> Value {
    json!({
        "success": true,
        "bookingDetails": {
            "transport": {
                "from": "Delhi",
                "to": "Udaipur",
                "options": [
                    { "id": 1, "car_type": "Sedan", "price_per_day": 2000, "seating_capacity": 4 },
                    { "id": 2, "car_type": "Tempo Traveller", "price_per_day": "5000", "seating_capacity": 12 }
                ]
            },
            "cities": [
                { "name": "Jaipur", "city_id": 1, "nights": 3, "hotel": [
                    { "room_id": 101, "hotel_id": 10, "hotel_name": "Pink Palace",
                      "room_categories_name": "Deluxe", "room_amenities": "WiFi, Breakfast",
                      "season_rate": 5000, "off_season_rates": 4000,
                      "season_extra_bed": 1500, "extra_bed": 1000 },
                    { "room_id": 102, "hotel_id": 10, "room_categories_name": "Super Deluxe",
                      "season_rate": 6000, "off_season_rates": 5000 }
                ]},
                { "city": "udaipur", "id": 99, "hotels": [
                    { "hotel_id": 20, "hotel_name": "Lake View", "address": "Lake Pichola",
                      "rooms": [{ "roomId": 101, "room_name": "Lake Facing", "season_rate": 3000, "off_season_rates": 2500 }] }
                ]}
            ]
        }
    })
}

pub fn trip_json() -> Value {
    json!({
        "destinations": [
            { "id": 1, "cityId": 1, "city": "Jaipur", "nights": 3 },
            { "id": 2, "cityId": 2, "city": "Udaipur", "nights": 2 }
        ],
        "leavingFrom": "Delhi",
        "leavingFromId": 5,
        "nationality": "Indian",
        "leavingOn": "2025-11-14",
        "travellers": 5,
        "adults": 5,
        "children": 0,
        "childAges": [],
        "rooms": 2,
        "starCategory": "4 Star",
        "addTransfers": true,
        "landOnly": false
    })
}

pub fn trip() -> TripRequest {
    serde_json::from_value(trip_json()).expect("valid trip")
}

pub fn session_with(backend: Arc<StubBackend>, trip: TripRequest) -> BookingSession {
    yatra_session::telemetry::init();
    BookingSession::new(trip, backend, SessionSettings::default()).with_token(VALID_TOKEN.into())
}

pub fn session(backend: Arc<StubBackend>) -> BookingSession {
    session_with(backend, trip())
}
