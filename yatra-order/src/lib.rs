pub mod checkout;
pub mod selection;
pub mod sequence;

pub use checkout::{CheckoutPayload, CheckoutPayloadBuilder, ConfirmedSelection};
pub use selection::{SelectionError, SelectionSnapshot, SelectionStore};
pub use sequence::{FetchKind, FetchScope, FetchTicket, RequestSequencer};
