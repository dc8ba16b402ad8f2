use crate::opbrc::Num;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn unix_now() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_secs())
    .unwrap_or_default()
}

/// Dynamic lifecycle record of a tick, created by `register` and filled in
/// by `deploy`. Settlement owns `settled_block_number` and `progress`;
/// everything else is immutable once deployed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InscriptionExt {
  pub chain: String,
  pub protocol: String,
  /// Lower-cased tick name, the primary key.
  pub tick: String,
  /// Tick as it appeared in the register payload, case preserved.
  pub origin_tick: String,
  pub registry_address: String,
  pub registry_block_number: u64,
  /// Mint duration in hours from the deploy block.
  pub mspan: u64,
  /// Minimum wei paid to the treasury per mint.
  pub cost: u64,
  /// Lifetime mint cap per address.
  pub mcount: u64,
  /// Settlement interval in minutes.
  pub sm: u64,
  /// Deployer revenue share.
  pub dr: Num,
  pub start_block_number: u64,
  pub end_block_number: u64,
  /// Last block whose settlement has completed; the window cursor.
  pub settled_block_number: u64,
  /// Fixed quota distributed per settlement window.
  pub avg_settle_qty: u64,
  /// 0 while minting may occur, 1 after finalisation.
  pub progress: u8,
  pub created_at: u64,
  pub updated_at: u64,
}

/// Cumulative mint attempts per `(tick, address)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressMintTimes {
  pub chain: String,
  pub protocol: String,
  pub tick: String,
  pub address: String,
  pub mint_times: u64,
  pub current_sm_mint_times: u64,
  pub created_at: u64,
  pub updated_at: u64,
}

/// Audit row for every observed `list`, `buy` and `proxy_pay`.
/// `process_status` is 1 once a proxy-pay found both linked txs, else 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPlaceTx {
  pub chain: String,
  pub protocol: String,
  pub op: String,
  pub tick: String,
  pub block_number: u64,
  pub tx_hash: String,
  pub list_address: String,
  pub buy_address: String,
  pub proxy_pay_address: String,
  pub mp_address: String,
  pub amt: Num,
  pub value: Num,
  pub md_content: String,
  pub process_status: i8,
  pub created_at: u64,
  pub updated_at: u64,
}

/// Durable copy of an accepted-but-unsettled mint. The four `*_content`
/// columns hold the observed block, tx, mint payload and metadata as
/// verbatim JSON so recovery can rebuild the in-memory buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempTx {
  pub chain: String,
  pub protocol: String,
  pub block_height: u64,
  /// Position of the tx inside its block; keeps replay in driver order.
  pub tx_index: u32,
  pub from_address: String,
  pub tx_hash: String,
  pub op: String,
  pub tick: String,
  pub block_content: String,
  pub tx_content: String,
  pub op_content: String,
  pub md_content: String,
  pub created_at: u64,
  pub updated_at: u64,
}

/// Static descriptor of a deployed tick, served by the caller's
/// inscription cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inscription {
  pub tick: String,
  pub origin_tick: String,
  pub total_supply: Num,
  pub deploy_by: String,
  pub mint_limit: u64,
}

/// Aggregate mint statistics for a tick, served by the caller's stats cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InscriptionStats {
  pub minted: Num,
}

/// Address balance as the downstream ledger sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
  pub available: Num,
  pub overall: Num,
}
