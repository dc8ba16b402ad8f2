use crate::{
  chain::{MetaData, RpcBlock, RpcTransaction},
  config::ChainConfig,
  event::TxResult,
};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

pub mod datastore;
mod error;
mod num;
pub mod operation;
pub mod params;
mod settle;
mod store;
pub mod types;
mod updater;

pub use self::{
  datastore::{CacheReadOnly, DataStoreReadOnly, DataStoreReadWrite},
  error::{Error, OpbrcError},
  num::Num,
  store::DataStore,
};

use self::{
  params::{
    BLOCKS_PER_MINUTE, OPERATE_BUY, OPERATE_DEPLOY, OPERATE_LIST, OPERATE_MINT,
    OPERATE_PROXY_PAY, OPERATE_REGISTER, OPERATE_TRANSFER, PROTOCOL_LITERAL,
  },
  settle::TempSettleMint,
  types::{Inscription, InscriptionExt},
};

/// Mutable per-tick state. The outer map hands out the `Arc`; all reads
/// and writes of the inner record go through its mutex, held for the
/// duration of one operation and never across another tick's lock.
#[derive(Debug, Default)]
pub(crate) struct TickState {
  pub(crate) mint_times: HashMap<String, u64>,
  pub(crate) temp_mints: Vec<TempSettleMint>,
}

/// The opbrc engine. The driver feeds it every candidate tx of a block in
/// order via [`Protocol::parse`], then calls [`Protocol::settle`] once at
/// the block boundary.
pub struct Protocol<L: DataStoreReadWrite, C: CacheReadOnly> {
  pub(crate) config: ChainConfig,
  pub(crate) store: L,
  pub(crate) cache: C,
  ticks: RwLock<HashMap<String, Inscription>>,
  tick_exts: RwLock<HashMap<String, InscriptionExt>>,
  states: RwLock<HashMap<String, Arc<Mutex<TickState>>>>,
}

impl<L: DataStoreReadWrite, C: CacheReadOnly> Protocol<L, C> {
  /// Rehydrates the tick registry and mint-times ledger from the store and
  /// replays persisted temp-txs into the in-memory buffers, so the engine
  /// resumes exactly where a previous process stopped.
  pub fn new(config: ChainConfig, store: L, cache: C) -> Result<Self, Error<L, C>> {
    let protocol = Self {
      config,
      store,
      cache,
      ticks: RwLock::new(HashMap::new()),
      tick_exts: RwLock::new(HashMap::new()),
      states: RwLock::new(HashMap::new()),
    };

    for ext in protocol
      .store
      .list_inscription_exts()
      .map_err(Error::StoreError)?
    {
      protocol
        .tick_exts
        .write()
        .unwrap()
        .insert(ext.tick.to_lowercase(), ext);
    }

    for row in protocol
      .store
      .list_address_mint_times()
      .map_err(Error::StoreError)?
    {
      let state = protocol.tick_state(&row.tick);
      let mut state = state.lock().unwrap();
      state
        .mint_times
        .insert(row.address.to_lowercase(), row.mint_times);
    }

    protocol.init_temp_txs()?;

    Ok(protocol)
  }

  /// Validates one observed operation. Unknown operations fall through
  /// with no results; mint rejections are logged and swallowed so a bad
  /// mint can never fail its enclosing block.
  pub fn parse(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    match md.operate.as_str() {
      OPERATE_REGISTER => self.process_register(block, tx, md),
      OPERATE_DEPLOY => self.process_deploy(block, tx, md),
      OPERATE_MINT => self.process_mint(block, tx, md),
      OPERATE_TRANSFER => self.process_transfer(block, tx, md),
      OPERATE_LIST => self.process_list(block, tx, md),
      OPERATE_BUY => self.process_buy(block, tx, md),
      OPERATE_PROXY_PAY => self.process_proxy_pay(block, tx, md),
      _ => Ok(Vec::new()),
    }
  }

  /// The engine's own persistence, for callers that need direct queries.
  pub fn store(&self) -> &L {
    &self.store
  }

  /// Tick descriptor lookup with cache-on-miss against the caller's
  /// inscription cache. Returns `None` for ticks never deployed.
  pub(crate) fn get_tick(&self, tick: &str) -> Result<Option<Inscription>, Error<L, C>> {
    let key = tick.to_lowercase();
    if let Some(inscription) = self.ticks.read().unwrap().get(&key) {
      return Ok(Some(inscription.clone()));
    }
    match self
      .cache
      .get_inscription(PROTOCOL_LITERAL, &key)
      .map_err(Error::CacheError)?
    {
      Some(inscription) => {
        self
          .ticks
          .write()
          .unwrap()
          .insert(key, inscription.clone());
        Ok(Some(inscription))
      }
      None => Ok(None),
    }
  }

  /// Lifecycle record lookup with read-through from the store.
  pub(crate) fn get_tick_ext(&self, tick: &str) -> Result<Option<InscriptionExt>, Error<L, C>> {
    let key = tick.to_lowercase();
    if let Some(ext) = self.tick_exts.read().unwrap().get(&key) {
      return Ok(Some(ext.clone()));
    }
    match self.store.get_inscription_ext(&key).map_err(Error::StoreError)? {
      Some(ext) => {
        self.tick_exts.write().unwrap().insert(key, ext.clone());
        Ok(Some(ext))
      }
      None => Ok(None),
    }
  }

  pub(crate) fn put_tick_ext(&self, ext: InscriptionExt) {
    self
      .tick_exts
      .write()
      .unwrap()
      .insert(ext.tick.to_lowercase(), ext);
  }

  pub(crate) fn tick_state(&self, tick: &str) -> Arc<Mutex<TickState>> {
    let key = tick.to_lowercase();
    if let Some(state) = self.states.read().unwrap().get(&key) {
      return state.clone();
    }
    self.states.write().unwrap().entry(key).or_default().clone()
  }

  pub(crate) fn push_temp_mint(&self, tick: &str, temp: TempSettleMint) {
    let state = self.tick_state(tick);
    let mut state = state.lock().unwrap();
    state.temp_mints.push(temp);
  }

  fn init_temp_txs(&self) -> Result<(), Error<L, C>> {
    let started = Instant::now();
    let exts = self
      .store
      .list_not_settled_exts()
      .map_err(Error::StoreError)?;
    for ext in exts {
      let tick = ext.tick.to_lowercase();
      let to_block = ext.settled_block_number + ext.sm * BLOCKS_PER_MINUTE;
      let rows = match self
        .store
        .load_temp_txs(&tick, ext.settled_block_number + 1, to_block)
      {
        Ok(rows) => rows,
        Err(e) => {
          warn!("load [{}] temp tx err {}", ext.tick, e);
          continue;
        }
      };
      for row in rows {
        let Some(temp) = TempSettleMint::from_row(&row) else {
          continue;
        };
        self.push_temp_mint(&tick, temp);
      }
    }
    info!("init temp tx use time {:?}", started.elapsed());
    Ok(())
  }
}
