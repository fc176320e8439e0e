use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use serde_with::{
    formats::PreferMany, DefaultOnError, DeserializeAs, DisplayFromStr, OneOrMany, PickFirst, Same,
};
use tracing::warn;

/// A number sent either as JSON number or numeric string. Anything else
/// (booleans, objects, garbage strings) becomes `None`.
pub(crate) type LenientNumber = DefaultOnError<Option<PickFirst<(Same, DisplayFromStr)>>>;

/// A single string or a list of strings; malformed values become empty.
pub(crate) type LenientList = DefaultOnError<OneOrMany<Same, PreferMany>>;

/// A nested collection that is dropped wholesale when it has the wrong shape.
pub(crate) type Lenient = DefaultOnError<Same>;

/// A rupee amount sent as an integer, a decimal number or a numeric string
/// such as `"5000.00"`. Whole values are kept exactly; fractional values are
/// rounded to the nearest rupee with a warning. Values that are not numbers
/// at all become `None`.
pub(crate) struct LenientAmount;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Whole(i64),
    Decimal(f64),
    Text(String),
    Other(IgnoredAny),
}

impl<'de> DeserializeAs<'de, Option<i64>> for LenientAmount {
    fn deserialize_as<D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawAmount>::deserialize(deserializer)?;
        Ok(raw.and_then(amount))
    }
}

fn amount(raw: RawAmount) -> Option<i64> {
    match raw {
        RawAmount::Whole(value) => Some(value),
        RawAmount::Decimal(value) => whole_rupees(value),
        RawAmount::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            if let Ok(value) = text.parse::<i64>() {
                return Some(value);
            }
            match text.parse::<f64>() {
                Ok(value) => whole_rupees(value),
                Err(_) => {
                    warn!(value = text, "Ignoring amount that is not a number");
                    None
                }
            }
        }
        RawAmount::Other(_) => None,
    }
}

fn whole_rupees(value: f64) -> Option<i64> {
    if !value.is_finite() {
        warn!(value, "Ignoring amount that is not finite");
        return None;
    }
    let rounded = value.round();
    if rounded != value {
        warn!(value, rounded, "Rounding fractional amount to whole rupees");
    }
    // `as` saturates at the i64 bounds.
    Some(rounded as i64)
}
