use crate::opbrc::Num;
use serde::{Deserialize, Serialize};

/// Block header fields the engine needs from the RPC driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcBlock {
  pub number: u64,
  pub hash: String,
  pub timestamp: u64,
}

/// Transaction fields the engine needs from the RPC driver.
///
/// `value` is in wei. Addresses are kept as the driver delivered them;
/// every comparison inside the engine is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcTransaction {
  pub block_number: u64,
  pub tx_index: u32,
  pub hash: String,
  pub from: String,
  pub to: String,
  pub value: Num,
}

/// Pre-extracted inscription envelope attached to a transaction.
///
/// `data` is the raw JSON payload; each validator decodes its own
/// operation shape from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
  pub chain: String,
  pub protocol: String,
  pub operate: String,
  pub tick: String,
  pub data: String,
}
