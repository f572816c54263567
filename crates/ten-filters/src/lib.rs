//! Filter/subscription parsing (C8) and `eth_call` parameter translation.
//! Grounded on `go/common/log_events.go`'s `FilterCriteria.UnmarshalJSON`
//! and the call-params normalisation described alongside it.

mod call;
mod criteria;
mod errors;

pub use call::{normalize_call_params, CallParams};
pub use criteria::{
    parse_filter_criteria, AddressesField, BlockNumberTag, FilterCriteria, TopicMatch,
};
pub use errors::FilterError;
