//! Sequencer specific workers and utils.

mod batch_builder;
mod batch_lifecycle;
mod block_builder;
mod ol_chain_tracker;
#[cfg(test)]
pub(crate) mod test_utils;
mod update_submitter;

pub use batch_builder::{
    create_batch_builder, init_batch_builder_state, Accumulator, BatchBuilderHandle,
    BatchBuilderState, BatchPolicy, BatchSealingPolicy, BlockCountData, BlockCountDataProvider,
    BlockCountPolicy, BlockCountValue, BlockDataProvider, FixedBlockCountSealing,
};
pub use batch_lifecycle::{
    create_batch_lifecycle_task, init_lifecycle_state, BatchLifecycleHandle, BatchLifecycleState,
};
pub use block_builder::{block_builder_task, BlockBuilderConfig};
pub use ol_chain_tracker::{
    build_ol_chain_tracker, init_ol_chain_tracker_state, InboxMessages, OLChainTrackerHandle,
    OLChainTrackerState,
};
pub use update_submitter::create_update_submitter_task;
