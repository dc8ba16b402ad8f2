use crate::opbrc::types::{
  AddressMintTimes, Balance, Inscription, InscriptionExt, InscriptionStats, MarketPlaceTx, TempTx,
};
use std::collections::HashMap;
use std::fmt::{Debug, Display};

/// Read side of the engine's own persistence: tick lifecycle records,
/// per-address mint counters, marketplace audit rows and the temp-tx
/// buffer. Tick arguments are canonicalised to lower case by the store.
pub trait DataStoreReadOnly {
  type Error: Debug + Display;

  fn get_inscription_ext(&self, tick: &str) -> Result<Option<InscriptionExt>, Self::Error>;

  fn list_inscription_exts(&self) -> Result<Vec<InscriptionExt>, Self::Error>;

  /// Every tick with `progress == 0`, i.e. still inside its mint span.
  fn list_not_settled_exts(&self) -> Result<Vec<InscriptionExt>, Self::Error>;

  fn list_address_mint_times(&self) -> Result<Vec<AddressMintTimes>, Self::Error>;

  fn get_market_tx(&self, tx_hash: &str) -> Result<Option<MarketPlaceTx>, Self::Error>;

  /// Buffered mints for `tick` with `from_block <= block_height <= to_block`,
  /// ordered by block height then tx index.
  fn load_temp_txs(
    &self,
    tick: &str,
    from_block: u64,
    to_block: u64,
  ) -> Result<Vec<TempTx>, Self::Error>;
}

pub trait DataStoreReadWrite: DataStoreReadOnly {
  fn insert_inscription_ext(&self, ext: &InscriptionExt) -> Result<(), Self::Error>;

  fn update_inscription_ext(&self, ext: &InscriptionExt) -> Result<(), Self::Error>;

  fn update_settled_block_number(
    &self,
    tick: &str,
    settled_block_number: u64,
  ) -> Result<(), Self::Error>;

  fn update_progress_mint_finish(&self, tick: &str) -> Result<(), Self::Error>;

  /// Creates one row per address; used for addresses first seen in the
  /// settling window. One store round-trip per call.
  fn insert_mint_times(
    &self,
    tick: &str,
    mint_times: &HashMap<String, u64>,
  ) -> Result<u64, Self::Error>;

  /// Rewrites `mint_times` for the given, already known addresses in a
  /// single round-trip; rows that do not exist are left alone.
  fn update_mint_times(
    &self,
    tick: &str,
    mint_times: &HashMap<String, u64>,
  ) -> Result<u64, Self::Error>;

  fn insert_market_tx(&self, mp_tx: &MarketPlaceTx) -> Result<(), Self::Error>;

  fn insert_temp_tx(&self, temp_tx: &TempTx) -> Result<(), Self::Error>;

  /// Deletes buffered mints in `[from_block, to_block]` for `tick`,
  /// returning how many rows went away.
  fn delete_temp_txs(&self, tick: &str, from_block: u64, to_block: u64)
    -> Result<u64, Self::Error>;
}

/// Query-only view of the downstream bookkeeping layer. The engine never
/// writes balances; deploys, transfers and settled mints reach the ledger
/// through emitted [`TxResult`]s.
///
/// [`TxResult`]: crate::event::TxResult
pub trait CacheReadOnly {
  type Error: Debug + Display;

  fn get_inscription(&self, protocol: &str, tick: &str)
    -> Result<Option<Inscription>, Self::Error>;

  fn get_inscription_stats(
    &self,
    protocol: &str,
    tick: &str,
  ) -> Result<Option<InscriptionStats>, Self::Error>;

  fn get_balance(
    &self,
    protocol: &str,
    tick: &str,
    address: &str,
  ) -> Result<Option<Balance>, Self::Error>;
}
