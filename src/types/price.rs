use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// USD price backed by an exact decimal.
///
/// Providers send prices either as JSON strings (`"43210.50"`) or as JSON
/// numbers (`43210.5`). Both are parsed from their textual form so the scale
/// the provider reported survives into the cache and the API response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Returns `None` for negative values.
    pub fn new(value: Decimal) -> Option<Self> {
        if value < Decimal::ZERO {
            None
        } else {
            Some(Price(value))
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
            .and_then(Self::new)
    }

    /// Reads a price out of a JSON string or number; anything else is absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Number(number) => Self::parse(&number.to_string()),
            _ => None,
        }
    }

    pub fn zero() -> Self {
        Price(Decimal::ZERO)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn string_prices_keep_their_scale() {
        let price = Price::from_json(&json!("43210.50")).expect("valid price");

        assert_eq!(price.as_decimal(), dec!(43210.50));
        assert_eq!(price.to_string(), "43210.50");
        assert_eq!(serde_json::to_value(price).unwrap(), json!("43210.50"));
    }

    #[test]
    fn numeric_prices_are_parsed_from_their_text() {
        assert_eq!(Price::from_json(&json!(43210.5)).unwrap().as_decimal(), dec!(43210.5));
        assert_eq!(Price::from_json(&json!(2)).unwrap().as_decimal(), dec!(2));
    }

    #[test]
    fn tiny_prices_in_scientific_notation_are_accepted() {
        let price = Price::from_json(&json!(0.00001234)).expect("valid price");
        assert_eq!(price.as_decimal(), dec!(0.00001234));
    }

    #[test]
    fn malformed_or_negative_values_are_absent() {
        assert_eq!(Price::from_json(&json!("not-a-number")), None);
        assert_eq!(Price::from_json(&json!(-1.5)), None);
        assert_eq!(Price::from_json(&json!(null)), None);
        assert_eq!(Price::from_json(&json!({"usd": 1})), None);
    }
}
