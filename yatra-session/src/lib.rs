//! Booking session state and the async flows that feed it.

pub mod auth;
pub mod error;
pub mod intake;
pub mod state;
pub mod telemetry;

pub use auth::AuthSession;
pub use error::{SessionError, SessionResult};
pub use state::{BookingSession, Confirmation, FetchOutcome, SessionSettings};
