pub mod backend;
pub mod trip;

pub use backend::{BackendError, BackendResult, BookingBackend, HotelQuery, SessionToken};
pub use trip::{Destination, TransferMode, TripRequest, TripRequestForm};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
