use super::{
  operation::Mint,
  params::{BLOCKS_PER_MINUTE, CHAIN_LITERAL, OPERATE_MINT, PROTOCOL_LITERAL},
  types::{unix_now, Inscription, InscriptionExt, TempTx},
  CacheReadOnly, DataStoreReadWrite, Error, Num, OpbrcError, Protocol,
};
use crate::{
  chain::{MetaData, RpcBlock, RpcTransaction},
  event::{Effect, MintEffect, TxResult},
};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

/// One accepted mint waiting for its window to close. The four parts are
/// persisted verbatim so a restarted process rebuilds an identical buffer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TempSettleMint {
  pub(crate) block: RpcBlock,
  pub(crate) tx: RpcTransaction,
  pub(crate) mint: Mint,
  pub(crate) md: MetaData,
}

impl TempSettleMint {
  pub(crate) fn to_row(&self, tick: &str) -> Result<TempTx, OpbrcError> {
    let now = unix_now();
    Ok(TempTx {
      chain: CHAIN_LITERAL.to_string(),
      protocol: PROTOCOL_LITERAL.to_string(),
      block_height: self.block.number,
      tx_index: self.tx.tx_index,
      from_address: self.tx.from.to_lowercase(),
      tx_hash: self.tx.hash.to_lowercase(),
      op: OPERATE_MINT.to_string(),
      tick: tick.to_string(),
      block_content: to_json(&self.block)?,
      tx_content: to_json(&self.tx)?,
      op_content: to_json(&self.mint)?,
      md_content: to_json(&self.md)?,
      created_at: now,
      updated_at: now,
    })
  }

  pub(crate) fn from_row(row: &TempTx) -> Option<Self> {
    let block = match serde_json::from_str(&row.block_content) {
      Ok(block) => block,
      Err(e) => {
        warn!("unmarshal block err {}", e);
        return None;
      }
    };
    let tx = match serde_json::from_str(&row.tx_content) {
      Ok(tx) => tx,
      Err(e) => {
        warn!("unmarshal tx err {}", e);
        return None;
      }
    };
    let mint = match serde_json::from_str(&row.op_content) {
      Ok(mint) => mint,
      Err(e) => {
        warn!("unmarshal mint err {}", e);
        return None;
      }
    };
    let md = match serde_json::from_str(&row.md_content) {
      Ok(md) => md,
      Err(e) => {
        warn!("unmarshal md err {}", e);
        return None;
      }
    };
    Some(Self {
      block,
      tx,
      mint,
      md,
    })
  }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, OpbrcError> {
  serde_json::to_string(value).map_err(|e| OpbrcError::PayloadDecode(e.to_string()))
}

impl<L: DataStoreReadWrite, C: CacheReadOnly> Protocol<L, C> {
  /// Runs one settlement pass at a block boundary. Every tick whose
  /// current window has closed distributes its quota; ticks whose window
  /// is still open, or that are already finalised, are skipped. Per-tick
  /// protocol errors skip only that tick; store and cache failures abort.
  pub fn settle(&self, block: &RpcBlock) -> Result<Vec<TxResult>, Error<L, C>> {
    let exts = self
      .store
      .list_not_settled_exts()
      .map_err(Error::StoreError)?;
    let mut results = Vec::new();
    for ext in exts {
      if ext.settled_block_number >= ext.end_block_number {
        debug!(
          "settle tick {} settledBlockNumber = {} endBlockNumber = {}",
          ext.tick, ext.settled_block_number, ext.end_block_number
        );
        continue;
      }
      let to_block = ext.settled_block_number + ext.sm * BLOCKS_PER_MINUTE;
      if to_block > block.number {
        debug!(
          "settle tick {} toBlockNumber = {} parsedMaxBlockNumber = {}",
          ext.tick, to_block, block.number
        );
        continue;
      }
      match self.settle_window(block, &ext, to_block) {
        Ok(mut emissions) => results.append(&mut emissions),
        Err(Error::DataVerificationFailed(e)) => {
          warn!("tick {} settle error: {}", ext.tick, e);
          continue;
        }
        Err(e) => return Err(e),
      }
    }
    Ok(results)
  }

  fn settle_window(
    &self,
    block: &RpcBlock,
    ext: &InscriptionExt,
    to_block: u64,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    let tick_name = ext.tick.to_lowercase();
    let Some(inscription) = self.get_tick(&tick_name)? else {
      return Err(OpbrcError::TickNotFound(format!("tick {} not found", tick_name)).into());
    };

    info!(
      " settle tick {} totalSupply = {} mspan = {} cost = {} mcount = {} endBlockNumber = {} settledBlockNumber = {} avgSettleQty = {} sm = {}",
      tick_name,
      inscription.total_supply,
      ext.mspan,
      ext.cost,
      ext.mcount,
      ext.end_block_number,
      ext.settled_block_number,
      ext.avg_settle_qty,
      ext.sm
    );

    let state = self.tick_state(&tick_name);
    let mut state = state.lock().unwrap();

    // Entries beyond the closing window stay buffered for the next one.
    let mut window = Vec::new();
    let mut rest = Vec::new();
    for temp in state.temp_mints.drain(..) {
      if temp.block.number <= to_block {
        window.push(temp);
      } else {
        rest.push(temp);
      }
    }
    state.temp_mints = rest;

    info!(" settle {} size {}", tick_name, window.len());

    // Classify in buffer order. Every attempt bumps the counter, capped
    // addresses just stop contributing to the valid set.
    let mut new_addresses: HashSet<String> = HashSet::new();
    let mut valid: Vec<TempSettleMint> = Vec::new();
    for temp in window {
      let minter = temp.tx.from.to_lowercase();
      let minted_times = state.mint_times.get(&minter).copied().unwrap_or(0);
      if minted_times == 0 {
        new_addresses.insert(minter.clone());
      }
      *state.mint_times.entry(minter).or_insert(0) += 1;
      if minted_times >= ext.mcount {
        continue;
      }
      valid.push(temp);
    }

    let mut results: Vec<TxResult> = Vec::new();
    if valid.is_empty() {
      info!(" settle {} mint addr is empty, auto settle to deployer", tick_name);
      results.push(auto_settle_result(
        block,
        &tick_name,
        &inscription,
        Num::from(ext.avg_settle_qty),
        format!("auto_settle_{}", block.number),
      ));
    } else {
      let single_mint_qty = ext.avg_settle_qty / valid.len() as u64;
      debug!("singleMintQty {}", single_mint_qty);
      for temp in valid {
        let minter = temp.tx.from.clone();
        results.push(TxResult {
          md: temp.md,
          block: temp.block,
          tx: temp.tx,
          effect: Effect::Mint(MintEffect {
            minter,
            amount: Num::from(single_mint_qty),
          }),
        });
      }
    }

    if block.number >= ext.end_block_number {
      self
        .store
        .update_progress_mint_finish(&tick_name)
        .map_err(Error::StoreError)?;
      match self
        .cache
        .get_inscription_stats(PROTOCOL_LITERAL, &tick_name)
        .map_err(Error::CacheError)?
      {
        None => warn!("tick {} minted stats missing", tick_name),
        Some(stats) => {
          // The remainder of the supply goes to the deployer: whatever the
          // ledger has not credited yet, minus this window's emissions.
          let mut left_qty = inscription.total_supply.checked_sub(&stats.minted)?;
          for result in &results {
            if let Effect::Mint(mint) = &result.effect {
              left_qty = left_qty.checked_sub(&mint.amount)?;
            }
          }
          results.push(auto_settle_result(
            block,
            &tick_name,
            &inscription,
            left_qty,
            format!("mint_finish_auto_settle_{}", block.number),
          ));
        }
      }
    }

    // Flush the counters: fresh addresses as inserts, the rest rewritten.
    let mut need_insert: HashMap<String, u64> = HashMap::new();
    let mut need_update: HashMap<String, u64> = HashMap::new();
    for (address, times) in &state.mint_times {
      if new_addresses.contains(address) {
        need_insert.insert(address.clone(), *times);
      } else {
        need_update.insert(address.clone(), *times);
      }
    }
    self
      .store
      .insert_mint_times(&tick_name, &need_insert)
      .map_err(Error::StoreError)?;
    self
      .store
      .update_mint_times(&tick_name, &need_update)
      .map_err(Error::StoreError)?;

    self
      .store
      .update_settled_block_number(&tick_name, block.number)
      .map_err(Error::StoreError)?;

    let mut updated = ext.clone();
    updated.settled_block_number = block.number;
    if block.number >= ext.end_block_number {
      updated.progress = 1;
    }
    updated.updated_at = unix_now();
    self.put_tick_ext(updated);

    if let Err(e) = self
      .store
      .delete_temp_txs(&tick_name, ext.settled_block_number + 1, to_block)
    {
      warn!("deleteTempTx tick [{}] err {}", tick_name, e);
    }

    Ok(results)
  }
}

fn auto_settle_result(
  block: &RpcBlock,
  tick: &str,
  inscription: &Inscription,
  amount: Num,
  hash: String,
) -> TxResult {
  TxResult {
    md: MetaData {
      chain: CHAIN_LITERAL.to_string(),
      protocol: PROTOCOL_LITERAL.to_string(),
      operate: OPERATE_MINT.to_string(),
      tick: tick.to_string(),
      data: String::new(),
    },
    block: block.clone(),
    tx: RpcTransaction {
      block_number: block.number,
      tx_index: 0,
      hash,
      from: inscription.deploy_by.clone(),
      to: inscription.deploy_by.clone(),
      value: Num::zero(),
    },
    effect: Effect::Mint(MintEffect {
      minter: inscription.deploy_by.clone(),
      amount,
    }),
  }
}
