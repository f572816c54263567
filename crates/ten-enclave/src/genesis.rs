//! Genesis account parsing, grounded on `bin/strata/src/genesis.rs`'s role
//! of turning a params file into the rollup's initial state - here the
//! state executor has no account ledger of its own (§1 non-goal: not
//! EVM-equivalent), so genesis reduces to a deterministic initial state
//! root derived from the account list, computed the same way
//! `ReferenceExecutor` folds any other state transition.
//!
//! Wire format (spec.md §6): UTF-8 JSON
//! `{ "Accounts": [{ "Address": "0x...20", "Amount": "<decimal>" }] }`.
//! An empty string selects the built-in testnet genesis.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use ten_primitives::{Address, Hash32};

use crate::errors::EnclaveError;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GenesisAccount {
    #[serde(rename = "Address")]
    pub address: Address,
    #[serde(rename = "Amount")]
    pub amount: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Default)]
pub struct GenesisAccounts {
    #[serde(rename = "Accounts")]
    pub accounts: Vec<GenesisAccount>,
}

/// Parses the genesis document. An empty string selects the built-in
/// testnet genesis rather than being treated as invalid JSON.
pub fn parse_genesis(raw: &str) -> Result<GenesisAccounts, EnclaveError> {
    if raw.is_empty() {
        return Ok(testnet_genesis());
    }
    serde_json::from_str(raw).map_err(|e| EnclaveError::Decode(format!("genesis: {e}")))
}

/// The built-in testnet genesis: a single funded account, address chosen
/// to be unmistakably a placeholder rather than a real key.
pub fn testnet_genesis() -> GenesisAccounts {
    GenesisAccounts {
        accounts: vec![GenesisAccount {
            address: Address::new([0x11; 20]),
            amount: "1000000000000000000000".to_string(),
        }],
    }
}

/// Derives the deterministic initial state root the first batch's
/// `prior_state_root` is fed, by hashing the accounts in document order.
/// `Amount` participates as its decimal string, not as a parsed integer -
/// genesis validity of the amount format is not this spec's concern.
pub fn genesis_state_root(accounts: &GenesisAccounts) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update((accounts.accounts.len() as u64).to_le_bytes());
    for account in &accounts.accounts {
        hasher.update(account.address.as_bytes());
        hasher.update(account.amount.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Hash32::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_selects_testnet_genesis() {
        let parsed = parse_genesis("").unwrap();
        assert_eq!(parsed, testnet_genesis());
    }

    #[test]
    fn parses_explicit_accounts_document() {
        let raw = r#"{"Accounts":[{"Address":"0x1111111111111111111111111111111111111111","Amount":"42"}]}"#;
        let parsed = parse_genesis(raw).unwrap();
        assert_eq!(parsed.accounts.len(), 1);
        assert_eq!(parsed.accounts[0].amount, "42");
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = parse_genesis("{not json").unwrap_err();
        assert!(matches!(err, EnclaveError::Decode(_)));
    }

    #[test]
    fn state_root_is_deterministic_and_order_sensitive() {
        let a = GenesisAccounts {
            accounts: vec![
                GenesisAccount {
                    address: Address::new([1; 20]),
                    amount: "1".to_string(),
                },
                GenesisAccount {
                    address: Address::new([2; 20]),
                    amount: "2".to_string(),
                },
            ],
        };
        let b = GenesisAccounts {
            accounts: vec![a.accounts[1].clone(), a.accounts[0].clone()],
        };
        assert_eq!(genesis_state_root(&a), genesis_state_root(&a));
        assert_ne!(genesis_state_root(&a), genesis_state_root(&b));
    }
}
