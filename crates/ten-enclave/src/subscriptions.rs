//! The authenticated log subscription registry: C8's server-side half.
//! spec.md §4.5 - the enclave pairs a filter with the calling client's
//! already-registered viewing key, never a client-supplied identity
//! field, to form the `LogSubscription` persisted for the session.
//! Grounded on the same registry shape as [`crate::viewingkeys::ViewingKeyRegistry`].

use std::collections::HashMap;

use parking_lot::RwLock;
use ten_filters::FilterCriteria;
use ten_primitives::Address;

use crate::viewingkeys::ViewingKey;

#[derive(Clone, Debug)]
pub struct LogSubscription {
    pub viewing_key: ViewingKey,
    pub filter: FilterCriteria,
}

/// One subscription per account - a second `rpc_subscribe_logs` call from
/// the same account replaces its prior filter, matching the mempool's
/// "unconditional admit" discipline rather than accumulating unbounded
/// subscriptions with no client-visible way to cancel them (no eviction
/// policy is specified either way).
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: RwLock<HashMap<Address, LogSubscription>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, viewing_key: ViewingKey, filter: FilterCriteria) {
        let account = viewing_key.account_address;
        self.subscriptions
            .write()
            .insert(account, LogSubscription { viewing_key, filter });
    }

    pub fn get(&self, account: Address) -> Option<LogSubscription> {
        self.subscriptions.read().get(&account).cloned()
    }
}

#[cfg(test)]
mod tests {
    use ten_crypto::SignatureType;
    use ten_filters::parse_filter_criteria;

    use super::*;

    fn vk(account: Address) -> ViewingKey {
        ViewingKey {
            public_key: b"pk".to_vec(),
            signature: b"sig".to_vec(),
            signature_type: SignatureType::PersonalSign,
            account_address: account,
        }
    }

    #[test]
    fn subscribing_twice_replaces_the_prior_filter() {
        let registry = SubscriptionRegistry::new();
        let account = Address::new([0x11; 20]);
        let empty = parse_filter_criteria(&serde_json::json!([])).unwrap();
        registry.subscribe(vk(account), empty.clone());
        assert!(registry.get(account).is_some());

        let narrower = parse_filter_criteria(&serde_json::json!({
            "address": format!("0x{}", hex::encode([0x22; 20])),
        }))
        .unwrap();
        registry.subscribe(vk(account), narrower);
        let stored = registry.get(account).unwrap();
        assert_eq!(stored.filter.addresses.len(), 1);
    }

    #[test]
    fn unknown_account_has_no_subscription() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.get(Address::new([0xFF; 20])).is_none());
    }
}
