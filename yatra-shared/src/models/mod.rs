//! Raw backend payloads.
//!
//! The booking backend is loosely typed: numbers arrive as strings, ids live
//! under several keys and lists sometimes collapse to a single value. These
//! records accept every shape the backend is known to send and default
//! anything malformed, so the inventory normalizer is the only place that
//! decides what a field means.

pub mod auth;
pub mod booking;
pub mod catalog;
mod lenient;

pub use auth::{AuthResponse, Credentials, Registration};
pub use booking::{
    BookingResponse, RawBookingDetails, RawCity, RawHotel, RawRoom, RawTransport,
    RawTransportOption,
};
pub use catalog::{
    CategoriesResponse, CitiesResponse, HotelListingResponse, RawCategory, RawCitySuggestion,
    RawFilters, RawSightseeing, SightseeingResponse,
};
