use async_trait::async_trait;
use yatra_shared::models::{
    AuthResponse, BookingResponse, CategoriesResponse, CitiesResponse, Credentials,
    HotelListingResponse, Registration, SightseeingResponse,
};
use yatra_shared::{CityId, HotelId, Masked};

use crate::trip::TripRequestForm;

/// Bearer token issued by `/login` or `/register`.
pub type SessionToken = Masked<String>;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Session is not authorized")]
    Unauthorized,

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Backend responded with status {0}")]
    Status(u16),

    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed backend response: {0}")]
    Malformed(String),
}

impl BackendError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized)
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Parameters of a `/change-hotel` lookup.
///
/// Without a hotel id the backend lists the city's hotels (optionally filtered
/// by category); with one it returns that hotel's rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HotelQuery {
    pub city_id: CityId,
    pub hotel_id: Option<HotelId>,
    pub category: Option<String>,
}

impl HotelQuery {
    pub fn hotels_in(city_id: CityId) -> Self {
        Self {
            city_id,
            hotel_id: None,
            category: None,
        }
    }

    pub fn rooms_of(city_id: CityId, hotel_id: HotelId) -> Self {
        Self {
            city_id,
            hotel_id: Some(hotel_id),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() {
            None
        } else {
            Some(category)
        };
        self
    }

    /// Query-string pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("cityId", self.city_id.to_string())];
        if let Some(hotel_id) = self.hotel_id {
            pairs.push(("hotelId", hotel_id.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("hotelCategory", category.clone()));
        }
        pairs
    }
}

/// The booking backend. Every call is a single request/response; callers
/// pass the session token explicitly rather than reading it from ambient
/// state.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// `GET /categories`; doubles as the session validity probe.
    async fn categories(&self, token: Option<&SessionToken>) -> BackendResult<CategoriesResponse>;

    /// `GET /cities?search=`
    async fn search_cities(
        &self,
        token: Option<&SessionToken>,
        query: &str,
    ) -> BackendResult<CitiesResponse>;

    /// `POST /booking` with the intake form as body.
    async fn booking_details(
        &self,
        token: Option<&SessionToken>,
        form: &TripRequestForm,
    ) -> BackendResult<BookingResponse>;

    /// `GET /change-hotel`
    async fn hotels(
        &self,
        token: Option<&SessionToken>,
        query: &HotelQuery,
    ) -> BackendResult<HotelListingResponse>;

    /// `GET /site-seeing?cityId=`
    async fn sightseeing(
        &self,
        token: Option<&SessionToken>,
        city_id: CityId,
    ) -> BackendResult<SightseeingResponse>;

    /// `POST /login`
    async fn login(&self, credentials: &Credentials) -> BackendResult<AuthResponse>;

    /// `POST /register`
    async fn register(&self, registration: &Registration) -> BackendResult<AuthResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_query_pairs() {
        let listing = HotelQuery::hotels_in(CityId(4)).with_category("4 Star");
        assert_eq!(
            listing.query_pairs(),
            vec![
                ("cityId", "4".to_string()),
                ("hotelCategory", "4 Star".to_string())
            ]
        );

        let rooms = HotelQuery::rooms_of(CityId(4), HotelId(70)).with_category("  ");
        assert_eq!(
            rooms.query_pairs(),
            vec![("cityId", "4".to_string()), ("hotelId", "70".to_string())]
        );
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(BackendError::Unauthorized.is_unauthorized());
        assert!(!BackendError::Status(500).is_unauthorized());
    }
}
