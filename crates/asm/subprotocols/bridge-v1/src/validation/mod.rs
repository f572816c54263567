//! Validation helpers for bridge transactions.

mod deposit;
mod slash;
mod unstake;
mod withdrawal_fulfillment;

pub(crate) use deposit::validate_deposit_info;
pub(crate) use slash::validate_slash_stake_connector;
pub(crate) use unstake::validate_unstake_info;
pub(crate) use withdrawal_fulfillment::validate_withdrawal_fulfillment_info;
