//! `FilterCriteria` parsing. Grounded on `go/common/log_events.go`'s
//! `FilterCriteria.UnmarshalJSON`: a custom deserializer because the
//! wire shape is permissive in ways `serde_json`'s derive can't express
//! directly (scalar-or-array address, per-position topic OR-sets, and a
//! JS-client quirk of sending `[]` in place of an object).

use std::str::FromStr;

use serde_json::Value;
use std::collections::HashMap;

use ten_primitives::{Address, Hash32};

use crate::errors::FilterError;

/// `fromBlock`/`toBlock`: either a literal height or one of the three
/// named tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNumberTag {
    Number(u64),
    Latest,
    Earliest,
    Pending,
}

/// The `address` field's three admitted shapes, normalised immediately
/// into a flat list via [`AddressesField::into_addresses`] - no raw
/// `serde_json::Value` survives past this point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressesField {
    None,
    Single(Address),
    Many(Vec<Address>),
}

impl AddressesField {
    pub fn into_addresses(self) -> Vec<Address> {
        match self {
            AddressesField::None => Vec::new(),
            AddressesField::Single(addr) => vec![addr],
            AddressesField::Many(addrs) => addrs,
        }
    }
}

/// One position in the `topics` array. Unlike addresses, per-position
/// structure is load-bearing for matching (each position is independently
/// an "any"/"exact"/"one of" test), so it survives as the stored shape
/// rather than being flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicMatch {
    Any,
    Exact(Hash32),
    OneOf(Vec<Hash32>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub block_hash: Option<Hash32>,
    pub from_block: Option<BlockNumberTag>,
    pub to_block: Option<BlockNumberTag>,
    pub addresses: Vec<Address>,
    pub topics: Vec<TopicMatch>,
}

/// Parses a filter argument exactly as `log_events.go` does: `null` or a
/// missing argument means "no filter" (match all), an empty top-level
/// array is tolerated the same way (the JS-client quirk), and anything
/// else must be an object following the rules below.
pub fn parse_filter_criteria(value: &Value) -> Result<FilterCriteria, FilterError> {
    match value {
        Value::Null => Ok(FilterCriteria::default()),
        Value::Array(items) if items.is_empty() => Ok(FilterCriteria::default()),
        Value::Array(_) => Err(FilterError::UnexpectedShape(
            "filter array must be empty".to_string(),
        )),
        Value::Object(map) => parse_filter_object(lowercase_fields(map)),
        other => Err(FilterError::UnexpectedShape(format!(
            "filter must be an object, null, or [], got {other}"
        ))),
    }
}

fn lowercase_fields(map: &serde_json::Map<String, Value>) -> HashMap<String, &Value> {
    let mut fields = HashMap::with_capacity(map.len());
    for (key, value) in map.iter() {
        fields.insert(key.to_lowercase(), value);
    }
    fields
}

fn parse_filter_object(fields: HashMap<String, &Value>) -> Result<FilterCriteria, FilterError> {
    let block_hash = match fields.get("blockhash") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_hash(v)?),
    };

    let has_from_block = !matches!(fields.get("fromblock"), None | Some(Value::Null));
    let has_to_block = !matches!(fields.get("toblock"), None | Some(Value::Null));

    let (from_block, to_block) = if block_hash.is_some() {
        if has_from_block || has_to_block {
            return Err(FilterError::Conflict);
        }
        (None, None)
    } else {
        let from = match fields.get("fromblock") {
            None | Some(Value::Null) => None,
            Some(v) => Some(parse_block_number_tag(v)?),
        };
        let to = match fields.get("toblock") {
            None | Some(Value::Null) => None,
            Some(v) => Some(parse_block_number_tag(v)?),
        };
        (from, to)
    };

    let addresses = parse_addresses_field(fields.get("address").copied())?.into_addresses();
    let topics = parse_topics(fields.get("topics").copied())?;

    Ok(FilterCriteria {
        block_hash,
        from_block,
        to_block,
        addresses,
        topics,
    })
}

fn parse_hash(value: &Value) -> Result<Hash32, FilterError> {
    match value {
        Value::String(s) => {
            Hash32::from_str(s).map_err(|e| FilterError::InvalidTopic(e.to_string()))
        }
        other => Err(FilterError::NonStringField(format!(
            "expected a hex32 string, got {other}"
        ))),
    }
}

fn parse_block_number_tag(value: &Value) -> Result<BlockNumberTag, FilterError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(BlockNumberTag::Number)
            .ok_or_else(|| FilterError::InvalidBlockTag(n.to_string())),
        Value::String(s) => match s.as_str() {
            "latest" => Ok(BlockNumberTag::Latest),
            "earliest" => Ok(BlockNumberTag::Earliest),
            "pending" => Ok(BlockNumberTag::Pending),
            hex => {
                let stripped = hex.strip_prefix("0x").unwrap_or(hex);
                u64::from_str_radix(stripped, 16)
                    .map(BlockNumberTag::Number)
                    .map_err(|e| FilterError::InvalidBlockTag(e.to_string()))
            }
        },
        other => Err(FilterError::InvalidBlockTag(format!(
            "expected an integer or tag string, got {other}"
        ))),
    }
}

fn parse_addresses_field(value: Option<&Value>) -> Result<AddressesField, FilterError> {
    match value {
        None | Some(Value::Null) => Ok(AddressesField::None),
        Some(Value::String(s)) => Address::from_str(s)
            .map(AddressesField::Single)
            .map_err(|e| FilterError::InvalidAddress(e.to_string())),
        Some(Value::Array(items)) => {
            let mut addresses = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => addresses.push(
                        Address::from_str(s)
                            .map_err(|e| FilterError::InvalidAddress(format!("index {index}: {e}")))?,
                    ),
                    other => {
                        return Err(FilterError::NonStringField(format!(
                            "address at index {index} is {other}"
                        )))
                    }
                }
            }
            Ok(AddressesField::Many(addresses))
        }
        Some(other) => Err(FilterError::UnexpectedShape(format!(
            "address must be a string, array, or null, got {other}"
        ))),
    }
}

fn parse_topics(value: Option<&Value>) -> Result<Vec<TopicMatch>, FilterError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(positions)) => positions.iter().map(parse_topic_position).collect(),
        Some(other) => Err(FilterError::UnexpectedShape(format!(
            "topics must be an array, got {other}"
        ))),
    }
}

fn parse_topic_position(value: &Value) -> Result<TopicMatch, FilterError> {
    match value {
        Value::Null => Ok(TopicMatch::Any),
        Value::String(s) => {
            Hash32::from_str(s).map(TopicMatch::Exact).map_err(|e| FilterError::InvalidTopic(e.to_string()))
        }
        Value::Array(items) => {
            // A `null` anywhere in the OR-set degrades the whole position to
            // "match any", mirroring `log_events.go`'s break-on-nil.
            if items.iter().any(Value::is_null) {
                return Ok(TopicMatch::Any);
            }
            let mut hashes = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => hashes.push(
                        Hash32::from_str(s).map_err(|e| FilterError::InvalidTopic(e.to_string()))?,
                    ),
                    other => {
                        return Err(FilterError::InvalidTopic(format!(
                            "non-string topic {other}"
                        )))
                    }
                }
            }
            Ok(TopicMatch::OneOf(hashes))
        }
        other => Err(FilterError::InvalidTopic(format!(
            "topic position must be null, a string, or an array, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_top_level_array_is_tolerated_as_no_filter() {
        let parsed = parse_filter_criteria(&json!([])).unwrap();
        assert_eq!(parsed, FilterCriteria::default());
    }

    #[test]
    fn missing_filter_is_no_filter() {
        assert_eq!(parse_filter_criteria(&Value::Null).unwrap(), FilterCriteria::default());
    }

    #[test]
    fn block_hash_conflicts_with_from_block() {
        let value = json!({
            "blockHash": format!("0x{}", "ab".repeat(32)),
            "fromBlock": 1,
        });
        assert_eq!(parse_filter_criteria(&value).unwrap_err(), FilterError::Conflict);
    }

    #[test]
    fn a_literal_null_from_block_does_not_conflict_with_block_hash() {
        let value = json!({
            "blockHash": format!("0x{}", "ab".repeat(32)),
            "fromBlock": Value::Null,
            "toBlock": Value::Null,
        });
        let parsed = parse_filter_criteria(&value).unwrap();
        assert!(parsed.block_hash.is_some());
        assert_eq!(parsed.from_block, None);
        assert_eq!(parsed.to_block, None);
    }

    #[test]
    fn scalar_address_is_lifted_to_a_one_element_list() {
        let addr = format!("0x{}", "11".repeat(20));
        let value = json!({ "address": addr });
        let parsed = parse_filter_criteria(&value).unwrap();
        assert_eq!(parsed.addresses, vec![Address::from_str(&addr).unwrap()]);
    }

    #[test]
    fn array_address_is_kept_as_is() {
        let a1 = format!("0x{}", "11".repeat(20));
        let a2 = format!("0x{}", "22".repeat(20));
        let value = json!({ "address": [a1.clone(), a2.clone()] });
        let parsed = parse_filter_criteria(&value).unwrap();
        assert_eq!(
            parsed.addresses,
            vec![Address::from_str(&a1).unwrap(), Address::from_str(&a2).unwrap()]
        );
    }

    #[test]
    fn wrong_length_address_is_rejected_not_truncated() {
        let value = json!({ "address": "0x1234" });
        assert!(parse_filter_criteria(&value).is_err());
    }

    #[test]
    fn topics_null_matches_any_at_that_position() {
        let value = json!({ "topics": [null, "0x".to_string() + &"ab".repeat(32)] });
        let parsed = parse_filter_criteria(&value).unwrap();
        assert_eq!(parsed.topics[0], TopicMatch::Any);
        assert!(matches!(parsed.topics[1], TopicMatch::Exact(_)));
    }

    #[test]
    fn topics_or_set_with_null_component_degrades_to_any() {
        let t0 = "0x".to_string() + &"cd".repeat(32);
        let value = json!({ "topics": [[t0, Value::Null]] });
        let parsed = parse_filter_criteria(&value).unwrap();
        assert_eq!(parsed.topics[0], TopicMatch::Any);
    }

    #[test]
    fn topics_or_set_without_null_is_a_one_of_match() {
        let t0 = "0x".to_string() + &"11".repeat(32);
        let t1 = "0x".to_string() + &"22".repeat(32);
        let value = json!({ "topics": [[t0.clone(), t1.clone()]] });
        let parsed = parse_filter_criteria(&value).unwrap();
        assert_eq!(
            parsed.topics[0],
            TopicMatch::OneOf(vec![
                Hash32::from_str(&t0).unwrap(),
                Hash32::from_str(&t1).unwrap()
            ])
        );
    }

    #[test]
    fn block_number_tag_accepts_named_tags_and_hex() {
        assert_eq!(parse_block_number_tag(&json!("latest")).unwrap(), BlockNumberTag::Latest);
        assert_eq!(parse_block_number_tag(&json!("0x10")).unwrap(), BlockNumberTag::Number(16));
        assert_eq!(parse_block_number_tag(&json!(42)).unwrap(), BlockNumberTag::Number(42));
    }

    #[test]
    fn unknown_field_case_is_lower_cased_before_matching() {
        let addr = format!("0x{}", "33".repeat(20));
        let value = json!({ "ADDRESS": addr.clone() });
        let parsed = parse_filter_criteria(&value).unwrap();
        assert_eq!(parsed.addresses, vec![Address::from_str(&addr).unwrap()]);
    }
}
