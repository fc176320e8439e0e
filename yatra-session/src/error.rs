use yatra_catalog::InventoryError;
use yatra_core::{BackendError, CoreError};
use yatra_order::SelectionError;
use yatra_shared::{CityId, HotelId, SightseeingId, TransportId};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Inventory has not been loaded yet")]
    InventoryNotReady,

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Backend error: {0}")]
    Backend(BackendError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Transport option not offered: {0}")]
    UnknownTransport(TransportId),

    #[error("Hotel {hotel_id} not listed for city {city_id}")]
    UnknownHotel { city_id: CityId, hotel_id: HotelId },

    #[error("Sightseeing {item_id} not offered in city {city_id}")]
    UnknownSightseeing { city_id: CityId, item_id: SightseeingId },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SessionError {
    /// The caller should clear its session and send the user back to log in.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            SessionError::Unauthorized | SessionError::Backend(BackendError::Unauthorized)
        )
    }
}

impl From<BackendError> for SessionError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized => SessionError::Unauthorized,
            other => SessionError::Backend(other),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
