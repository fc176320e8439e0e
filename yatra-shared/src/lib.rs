pub mod ids;
pub mod models;
pub mod pii;

pub use ids::{CityId, HotelId, RoomId, SightseeingId, TransportId};
pub use pii::Masked;
