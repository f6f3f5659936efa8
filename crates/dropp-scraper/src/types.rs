//! Response shapes for the two JSON sources.
//!
//! ### Status endpoint
//! A flat object with a human-readable `message` (e.g. `"In Stock"`,
//! `"Available for pre-order"`) and a numeric `final_price` already rounded to
//! currency precision. Absent or `null` fields decode to their zero value
//! rather than failing, so `{}` is a valid (if uninformative) body.
//!
//! ### Marketplace listing
//! Every scalar arrives as a JSON string, including `quantity` and
//! `quantity_sold`. The price is nested as
//! `{"_currencyID": "USD", "value": "19.99"}` and may be `null`. Only
//! `status` is consumed; the rest is modelled so the contract is explicit.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
pub struct StatusData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub final_price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketplacePrice {
    #[serde(default, rename = "_currencyID")]
    pub currency_id: Option<String>,

    #[serde(default)]
    pub value: Option<String>,
}

/// A marketplace listing as returned by the marketplace item endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MarketplaceItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_price: MarketplacePrice,

    /// Marketplace listing identifier.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Units left, as a decimal string.
    #[serde(default)]
    pub quantity: Option<String>,

    #[serde(default)]
    pub quantity_sold: Option<String>,

    /// Listing state. Only the exact literal `"Active"` means listed.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Decodes an explicit `null` as `T::default()`, the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_status_fields_decode_to_zero_values() {
        let data: StatusData =
            serde_json::from_str(r#"{"message":null,"final_price":null}"#).unwrap();
        assert_eq!(data.message, "");
        assert_eq!(data.final_price.to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn null_current_price_decodes_to_empty_price() {
        let item: MarketplaceItem =
            serde_json::from_str(r#"{"id":"1","status":"Active","current_price":null}"#).unwrap();
        assert!(item.current_price.currency_id.is_none());
        assert!(item.current_price.value.is_none());
        assert_eq!(item.status.as_deref(), Some("Active"));
    }
}
