use serde::Deserialize;
use serde_with::serde_as;

use super::booking::{RawHotel, RawRoom};
use super::lenient::{Lenient, LenientAmount, LenientNumber};

/// Star category entry. The backend sends either `{ id, name }` objects or
/// bare strings depending on the endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCategory {
    Named {
        #[serde(default)]
        id: Option<serde_json::Value>,
        name: String,
    },
    Plain(String),
}

impl RawCategory {
    pub fn name(&self) -> &str {
        match self {
            RawCategory::Named { name, .. } => name,
            RawCategory::Plain(name) => name,
        }
    }
}

/// Response of `GET /categories`, also used as the session validity probe.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub categories: Vec<RawCategory>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub data: Vec<RawCategory>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCitySuggestion {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Response of `GET /cities?search=`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CitiesResponse {
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub cities: Vec<RawCitySuggestion>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilters {
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub categories: Vec<RawCategory>,
}

/// Response of `GET /change-hotel`. Without a hotel id it lists hotels, with
/// one it lists that hotel's rooms.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelListingResponse {
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub hotels: Vec<RawHotel>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub rooms: Vec<RawRoom>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub filters: RawFilters,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSightseeing {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub id: Option<i64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub city_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sightseeing_details: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde_as(as = "LenientAmount")]
    #[serde(default)]
    pub price: Option<i64>,
    #[serde_as(as = "LenientAmount")]
    #[serde(default)]
    pub rate: Option<i64>,
}

/// Response of `GET /site-seeing?cityId=`; the list lives under `data` on the
/// live API and under `sightseeing` on older deployments.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SightseeingResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub data: Vec<RawSightseeing>,
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub sightseeing: Vec<RawSightseeing>,
}

impl SightseeingResponse {
    pub fn into_items(self) -> Vec<RawSightseeing> {
        if self.data.is_empty() {
            self.sightseeing
        } else {
            self.data
        }
    }
}
