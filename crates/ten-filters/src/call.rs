//! `eth_call` parameter normalisation, as spec.md §4.6: lower-cased field
//! names with last-occurrence-wins, non-string `to/from/data/value`
//! rejected, `from` defaulting to the zero address, `data`/`value`
//! hex-decoded.

use std::{collections::HashMap, str::FromStr};

use serde_json::Value;
use ten_primitives::Address;

use crate::errors::FilterError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParams {
    pub to: Option<Address>,
    pub from: Address,
    pub data: Vec<u8>,
    pub value: Vec<u8>,
}

pub fn normalize_call_params(value: &Value) -> Result<CallParams, FilterError> {
    let map = value
        .as_object()
        .ok_or_else(|| FilterError::UnexpectedShape("eth_call params must be an object".to_string()))?;

    let mut fields: HashMap<String, &Value> = HashMap::with_capacity(map.len());
    for (key, value) in map.iter() {
        // Iteration order follows insertion order (`preserve_order`), so a
        // later duplicate-under-lowercasing key legitimately overwrites an
        // earlier one here, matching "last occurrence wins".
        fields.insert(key.to_lowercase(), value);
    }

    let to = optional_address(fields.get("to").copied(), "to")?;
    let from = optional_address(fields.get("from").copied(), "from")?.unwrap_or(Address::ZERO);
    let data = optional_hex_bytes(fields.get("data").copied(), "data")?.unwrap_or_default();
    let call_value = optional_hex_bytes(fields.get("value").copied(), "value")?.unwrap_or_default();

    Ok(CallParams {
        to,
        from,
        data,
        value: call_value,
    })
}

fn optional_address(value: Option<&Value>, field: &str) -> Result<Option<Address>, FilterError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Address::from_str(s)
            .map(Some)
            .map_err(|e| FilterError::InvalidAddress(e.to_string())),
        Some(_) => Err(FilterError::NonStringField(field.to_string())),
    }
}

fn optional_hex_bytes(value: Option<&Value>, field: &str) -> Result<Option<Vec<u8>>, FilterError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let stripped = s.strip_prefix("0x").unwrap_or(s);
            hex::decode(stripped)
                .map(Some)
                .map_err(|e| FilterError::InvalidHex(e.to_string()))
        }
        Some(_) => Err(FilterError::NonStringField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_from_defaults_to_zero_address() {
        let value = json!({ "to": format!("0x{}", "11".repeat(20)) });
        let params = normalize_call_params(&value).unwrap();
        assert_eq!(params.from, Address::ZERO);
    }

    #[test]
    fn duplicate_keys_under_lowercasing_take_the_last_one() {
        let value = json!({ "From": format!("0x{}", "11".repeat(20)), "from": format!("0x{}", "22".repeat(20)) });
        let params = normalize_call_params(&value).unwrap();
        assert_eq!(params.from, Address::from_str(&format!("0x{}", "22".repeat(20))).unwrap());
    }

    #[test]
    fn non_string_data_is_rejected() {
        let value = json!({ "data": 12 });
        assert!(matches!(
            normalize_call_params(&value),
            Err(FilterError::NonStringField(_))
        ));
    }

    #[test]
    fn data_and_value_are_hex_decoded() {
        let value = json!({ "data": "0xdeadbeef", "value": "0x01" });
        let params = normalize_call_params(&value).unwrap();
        assert_eq!(params.data, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(params.value, vec![0x01]);
    }

    #[test]
    fn malformed_hex_is_an_error() {
        let value = json!({ "data": "0xzz" });
        assert!(matches!(normalize_call_params(&value), Err(FilterError::InvalidHex(_))));
    }
}
