pub mod inventory;
pub mod normalize;
pub mod pricing;
pub mod product;
pub mod selection;

pub use inventory::{CityInventory, Inventory, InventoryError};
pub use normalize::{HotelListing, NormalizedInventory, UnresolvedDestination};
pub use pricing::{PricedSummary, PricingConfig, PricingEngine, PricingInput};
pub use product::{CitySuggestion, HotelOffer, RoomOffer, SightseeingItem, TransportOption};
pub use selection::{RoomOptions, RoomSelection, TransportSelection};
