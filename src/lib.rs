//! Protocol engine for `opbrc` inscriptions on an EVM-compatible chain.
//!
//! The engine consumes a stream of `(block, tx, metadata)` triples from an
//! external block driver, validates each inscription operation, and emits
//! [`TxResult`] records for a downstream bookkeeping layer to apply. Mints
//! are not credited immediately: they are buffered per tick and materialised
//! by the periodic settlement pass ([`Protocol::settle`]).

pub mod chain;
pub mod config;
pub mod event;
pub mod opbrc;

pub use crate::{
  chain::{MetaData, RpcBlock, RpcTransaction},
  config::ChainConfig,
  event::{DeployEffect, Effect, MintEffect, Receive, TransferEffect, TxResult},
  opbrc::{
    CacheReadOnly, DataStore, DataStoreReadOnly, DataStoreReadWrite, Error, Num, OpbrcError,
    Protocol,
  },
};
