use serde::Deserialize;
use serde_with::serde_as;

use super::lenient::{Lenient, LenientAmount, LenientList, LenientNumber};

/// Response of `POST /booking`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, rename = "bookingDetails")]
    pub booking_details: Option<RawBookingDetails>,
    #[serde(default)]
    pub message: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBookingDetails {
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub transport: Option<RawTransport>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub cities: Vec<RawCity>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransport {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub options: Vec<RawTransportOption>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransportOption {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub car_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(as = "LenientAmount")]
    #[serde(default)]
    pub price_per_day: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub seating_capacity: Option<i64>,
}

/// A city record as returned inside `bookingDetails.cities`.
///
/// Rooms arrive either flat (`hotel` / `rooms`, each room carrying its own
/// hotel fields) or nested under `hotels`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub city_id: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub id: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub nights: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub hotel: Vec<RawRoom>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub rooms: Vec<RawRoom>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub hotels: Vec<RawHotel>,
}

impl RawCity {
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.city.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn backend_id(&self) -> Option<i64> {
        self.city_id.or(self.id)
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHotel {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub hotel_cat_name: Option<String>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub rooms: Vec<RawRoom>,
}

impl RawHotel {
    pub fn backend_id(&self) -> Option<i64> {
        self.hotel_id.or(self.id)
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRoom {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default, rename = "roomId")]
    pub room_id_alt: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub room_categories_name: Option<String>,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde_as(as = "LenientList")]
    #[serde(default)]
    pub room_amenities: Vec<String>,
    #[serde_as(as = "LenientList")]
    #[serde(default)]
    pub images: Vec<String>,
    #[serde_as(as = "LenientAmount")]
    #[serde(default)]
    pub season_rate: Option<i64>,
    #[serde_as(as = "LenientAmount")]
    #[serde(default)]
    pub off_season_rates: Option<i64>,
    #[serde_as(as = "LenientAmount")]
    #[serde(default)]
    pub season_extra_bed: Option<i64>,
    #[serde_as(as = "LenientAmount")]
    #[serde(default)]
    pub extra_bed: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub hotel_cat_name: Option<String>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub city_id: Option<i64>,
}
