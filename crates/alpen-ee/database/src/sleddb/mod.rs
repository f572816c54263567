mod db;
mod init;
mod schema;

pub(crate) use db::EeNodeDBSled;
pub(crate) use init::init_database;
pub use init::{BroadcastDbOps, ChunkedEnvelopeOps, EeDatabases};
pub(crate) use schema::{
    AccountStateAtOLEpochSchema, BatchByIdxSchema, BatchChunksSchema, BatchIdToIdxSchema,
    ChunkByIdxSchema, ChunkIdToIdxSchema, ExecBlockFinalizedSchema, ExecBlockPayloadSchema,
    ExecBlockSchema, ExecBlocksAtHeightSchema, OLBlockAtEpochSchema,
};
