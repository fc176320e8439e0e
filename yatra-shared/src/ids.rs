use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Canonical city identifier. The trip request's value always wins over
    /// whatever id the backend attaches to a city record.
    CityId
);

numeric_id!(
    /// Room identifier. Unique only within a `(city, hotel)` pair, so lookups
    /// must always pair it with a [`CityId`].
    RoomId
);

numeric_id!(HotelId);
numeric_id!(TransportId);
numeric_id!(SightseeingId);
