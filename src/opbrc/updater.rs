use super::{
  operation::{decode_payload, Buy, Deploy, List, Mint, ProxyPay, Register, ToItem, Transfer},
  params::{
    is_valid_eth_address, BIGDECIMAL_TEN, BLOCKS_PER_HOUR, BLOCKS_PER_MINUTE, CHAIN_LITERAL,
    MAX_DECIMAL_WIDTH, MIN_TICK_LEN, PROTOCOL_LITERAL,
  },
  settle::TempSettleMint,
  types::{unix_now, InscriptionExt, MarketPlaceTx},
  CacheReadOnly, DataStoreReadWrite, Error, Num, OpbrcError, Protocol,
};
use crate::{
  chain::{MetaData, RpcBlock, RpcTransaction},
  event::{DeployEffect, Effect, Receive, TransferEffect, TxResult},
};
use log::{info, warn};

impl<L: DataStoreReadWrite, C: CacheReadOnly> Protocol<L, C> {
  pub(super) fn process_register(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    self.check_register(block, tx, md)?;
    Ok(Vec::new())
  }

  /// Registration reserves a tick for a fee scaled by its length and
  /// records who may later deploy it. The row is written here; nothing is
  /// emitted until deploy.
  fn check_register(
    &self,
    _block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Register, Error<L, C>> {
    if !self.config.is_treasury(&tx.to) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "tx.to[{}] != treasury_address[{}]",
          tx.to, self.config.treasury_address
        ))
        .into(),
      );
    }
    self.check_metadata(md)?;

    let mut register: Register = decode_payload(&md.data)?;
    register.tick = register.tick.trim().to_string();
    if register.tick.len() < MIN_TICK_LEN {
      return Err(
        OpbrcError::PayloadDecode(format!(
          "register tick[{}] length less than {}",
          register.tick, MIN_TICK_LEN
        ))
        .into(),
      );
    }

    let base = BIGDECIMAL_TEN.checked_powu(MAX_DECIMAL_WIDTH as u64)?;
    let register_fee = self
      .config
      .register_fee(register.tick.len())
      .checked_mul(&base)?;
    if tx.value < register_fee {
      return Err(
        OpbrcError::FeeInsufficient(format!(
          "register tick[{}] fee[{}] greater than tx value[{}]",
          register.tick, register_fee, tx.value
        ))
        .into(),
      );
    }

    if self.get_tick_ext(&register.tick)?.is_some() {
      return Err(
        OpbrcError::DuplicateTick(format!("register tick[{}] exists", register.tick)).into(),
      );
    }

    let now = unix_now();
    let ext = InscriptionExt {
      chain: CHAIN_LITERAL.to_string(),
      protocol: PROTOCOL_LITERAL.to_string(),
      tick: register.tick.to_lowercase(),
      origin_tick: register.tick.clone(),
      registry_address: tx.from.to_lowercase(),
      registry_block_number: tx.block_number,
      mspan: 0,
      cost: 0,
      mcount: 0,
      sm: 0,
      dr: Num::zero(),
      start_block_number: 0,
      end_block_number: 0,
      settled_block_number: 0,
      avg_settle_qty: 0,
      progress: 0,
      created_at: now,
      updated_at: now,
    };
    self
      .store
      .insert_inscription_ext(&ext)
      .map_err(Error::StoreError)?;
    self.put_tick_ext(ext);

    Ok(register)
  }

  pub(super) fn process_deploy(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    let deploy = self.check_deploy(block, tx, md)?;

    Ok(vec![TxResult {
      md: md.clone(),
      block: block.clone(),
      tx: tx.clone(),
      effect: Effect::Deploy(DeployEffect {
        name: deploy.tick.clone(),
        max_supply: deploy.max,
        mint_limit: deploy.mcount,
        decimal: 0,
      }),
    }])
  }

  fn check_deploy(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Deploy, Error<L, C>> {
    if !self.config.is_treasury(&tx.to) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "tx.to[{}] != treasury_address[{}]",
          tx.to, self.config.treasury_address
        ))
        .into(),
      );
    }
    self.check_metadata(md)?;

    let deploy: Deploy = decode_payload(&md.data.to_lowercase())?;

    let Some(ext) = self.get_tick_ext(&md.tick)? else {
      return Err(OpbrcError::TickNotFound(format!("tick {} not reg", deploy.tick)).into());
    };
    if !ext.registry_address.eq_ignore_ascii_case(&tx.from) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "tick {} reg addr {} not deploy addr {}",
          deploy.tick, ext.registry_address, tx.from
        ))
        .into(),
      );
    }

    if self.get_tick(&md.tick)?.is_some() {
      return Err(
        OpbrcError::DuplicateTick(format!("inscription deployed & abort, tick[{}]", md.tick))
          .into(),
      );
    }

    let max = deploy.max.int_part();
    if max <= 0 || max > i64::MAX as i128 {
      return Err(OpbrcError::AmountOutOfRange(format!("deploy max[{}] invalid", deploy.max)).into());
    }
    let mspan = deploy.mspan.int_part();
    if mspan <= 0 || mspan > i32::MAX as i128 {
      return Err(
        OpbrcError::AmountOutOfRange(format!("deploy mspan[{}] invalid", deploy.mspan)).into(),
      );
    }
    let mcount = deploy.mcount.int_part();
    if mcount <= 0 || mcount > i32::MAX as i128 {
      return Err(
        OpbrcError::AmountOutOfRange(format!("deploy mcount[{}] invalid", deploy.mcount)).into(),
      );
    }
    let sm = deploy.sm.int_part();
    if sm <= 0 || sm > i32::MAX as i128 {
      return Err(OpbrcError::AmountOutOfRange(format!("deploy sm[{}] invalid", deploy.sm)).into());
    }
    let cost = deploy.cost.int_part();
    if cost < 0 || cost > i64::MAX as i128 {
      return Err(
        OpbrcError::AmountOutOfRange(format!("deploy cost[{}] invalid", deploy.cost)).into(),
      );
    }

    // Revenue share and cost must not disagree in sign; `dr = 0, cost > 0`
    // passes.
    let zero = Num::zero();
    if (deploy.dr > zero && deploy.cost <= zero) || (deploy.dr < zero && deploy.cost >= zero) {
      return Err(
        OpbrcError::AmountOutOfRange(format!(
          "deploy dr[{}] and cost[{}] invalid",
          deploy.dr, deploy.cost
        ))
        .into(),
      );
    }

    // A settlement interval longer than the whole mint span would leave
    // zero windows to distribute over.
    let windows = mspan as u64 * BLOCKS_PER_MINUTE / sm as u64;
    if windows == 0 {
      return Err(
        OpbrcError::AmountOutOfRange(format!(
          "deploy sm[{}] exceeds mint span of {} minutes",
          sm,
          mspan as u64 * BLOCKS_PER_MINUTE
        ))
        .into(),
      );
    }

    let mut ext = ext;
    ext.mspan = mspan as u64;
    ext.cost = cost as u64;
    ext.mcount = mcount as u64;
    ext.sm = sm as u64;
    ext.dr = deploy.dr;
    ext.start_block_number = block.number;
    ext.settled_block_number = block.number;
    ext.end_block_number = block.number + mspan as u64 * BLOCKS_PER_HOUR;
    ext.avg_settle_qty = max as u64 / windows;
    ext.progress = 0;
    ext.updated_at = unix_now();

    self
      .store
      .update_inscription_ext(&ext)
      .map_err(Error::StoreError)?;
    self.put_tick_ext(ext);

    Ok(deploy)
  }

  pub(super) fn process_mint(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    match self.check_mint(block, tx, md) {
      Ok(_) => Ok(Vec::new()),
      // A rejected mint must not fail its enclosing block; the other txs
      // of the block still commit.
      Err(Error::DataVerificationFailed(e)) => {
        warn!("mint check err:{}, data[{}]", e, md.data);
        Ok(Vec::new())
      }
      Err(e) => Err(e),
    }
  }

  fn check_mint(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Mint, Error<L, C>> {
    if !self.config.is_treasury(&tx.to) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "tx.to[{}] != treasury_address[{}]",
          tx.to, self.config.treasury_address
        ))
        .into(),
      );
    }
    self.check_metadata(md)?;

    let mint: Mint = decode_payload(&md.data)?;
    let tick_name = mint.tick.to_lowercase();

    if self.get_tick(&tick_name)?.is_none() {
      return Err(OpbrcError::TickNotFound(format!("tick[{}] not found", mint.tick)).into());
    }
    let Some(ext) = self.get_tick_ext(&tick_name)? else {
      return Err(OpbrcError::TickNotFound(format!("tickExt[{}] not found", mint.tick)).into());
    };

    if block.number > ext.end_block_number {
      return Err(
        OpbrcError::TickWrongProgress(format!(
          "tick[{}] mint ended at block[{}], current block[{}]",
          mint.tick, ext.end_block_number, block.number
        ))
        .into(),
      );
    }

    if tx.value < Num::from(ext.cost) {
      return Err(
        OpbrcError::FeeInsufficient(format!(
          "mint cost[{}] greater than tx value[{}]",
          ext.cost, tx.value
        ))
        .into(),
      );
    }

    let temp = TempSettleMint {
      block: block.clone(),
      tx: tx.clone(),
      mint: mint.clone(),
      md: md.clone(),
    };
    let row = temp.to_row(&tick_name)?;
    self.store.insert_temp_tx(&row).map_err(Error::StoreError)?;
    self.push_temp_mint(&tick_name, temp);

    Ok(mint)
  }

  pub(super) fn process_transfer(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    let transfer = self.check_transfer(tx, md)?;

    Ok(vec![TxResult {
      md: md.clone(),
      block: block.clone(),
      tx: tx.clone(),
      effect: Effect::Transfer(transfer),
    }])
  }

  fn check_transfer(
    &self,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<TransferEffect, Error<L, C>> {
    if !self.config.is_treasury(&tx.to) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "tx.to[{}] != treasury_address[{}]",
          tx.to, self.config.treasury_address
        ))
        .into(),
      );
    }
    self.check_metadata(md)?;

    let transfer: Transfer = decode_payload(&md.data)?;
    if transfer.to.is_empty() {
      return Err(OpbrcError::PayloadDecode("to list is empty".to_string()).into());
    }

    let mut receives: Vec<&ToItem> = Vec::new();
    for to in &transfer.to {
      if !is_valid_eth_address(&to.recv) {
        info!("to address is not valid eth address, to address[{}]", to.recv);
        continue;
      }
      if check_amount_range(&to.amt, "to amount").is_err() {
        info!("to amount is out of range, to amount[{}]", to.amt);
        continue;
      }
      receives.push(to);
    }

    let tick_name = md.tick.to_lowercase();
    if self.get_tick(&tick_name)?.is_none() {
      return Err(OpbrcError::TickNotFound(format!("inscription not exist, tick[{}]", md.tick)).into());
    }

    let Some(balance) = self
      .cache
      .get_balance(PROTOCOL_LITERAL, &tick_name, &tx.from.to_lowercase())
      .map_err(Error::CacheError)?
    else {
      return Err(
        OpbrcError::BalanceInsufficient(format!(
          "sender balance record not exist, tick[{}], address[{}]",
          md.tick, tx.from
        ))
        .into(),
      );
    };

    // Greedy allocation in payload order: a receive is dropped once the
    // remaining balance cannot cover it.
    let mut remaining = balance.overall;
    let mut effect = TransferEffect {
      sender: tx.from.clone(),
      receives: Vec::new(),
    };
    for to in receives {
      if remaining < to.amt {
        continue;
      }
      effect.receives.push(Receive {
        address: to.recv.clone(),
        amount: to.amt,
      });
      remaining = remaining.checked_sub(&to.amt)?;
    }

    Ok(effect)
  }

  pub(super) fn process_list(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    self.check_list(block, tx, md)?;
    Ok(Vec::new())
  }

  fn check_list(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<List, Error<L, C>> {
    if !self.config.is_treasury(&tx.to) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "tx.to[{}] != treasury_address[{}]",
          tx.to, self.config.treasury_address
        ))
        .into(),
      );
    }
    self.check_metadata(md)?;

    let tick_name = md.tick.to_lowercase();
    if self.get_tick(&tick_name)?.is_none() {
      return Err(
        OpbrcError::TickNotFound(format!("inscription not deployed, tick[{}]", md.tick)).into(),
      );
    }
    let Some(ext) = self.get_tick_ext(&tick_name)? else {
      return Err(OpbrcError::TickNotFound(format!("tick[{}] not found", md.tick)).into());
    };
    if ext.progress != 1 {
      return Err(
        OpbrcError::TickWrongProgress(format!(
          "tick[{}] progress[{}] != 1",
          md.tick, ext.progress
        ))
        .into(),
      );
    }

    let list: List = decode_payload(&md.data.to_lowercase())?;
    if list.p != PROTOCOL_LITERAL {
      return Err(
        OpbrcError::PayloadDecode(format!("protocol[{}] != protocol[{}]", list.p, PROTOCOL_LITERAL))
          .into(),
      );
    }
    if !self.config.is_market_place(&list.mp) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "mp[{}] != market place address[{}]",
          list.mp, self.config.market_place_address
        ))
        .into(),
      );
    }

    check_amount_range(&list.amt, "amt")?;
    check_amount_range(&list.value, "value")?;
    check_tx_value_range(&tx.value)?;

    let Some(balance) = self
      .cache
      .get_balance(PROTOCOL_LITERAL, &tick_name, &tx.from.to_lowercase())
      .map_err(Error::CacheError)?
    else {
      return Err(
        OpbrcError::BalanceInsufficient(format!(
          "balance not found, tick[{}], address[{}]",
          md.tick, tx.from
        ))
        .into(),
      );
    };
    if balance.overall < list.amt {
      return Err(
        OpbrcError::BalanceInsufficient(format!(
          "balance not enough, tick[{}], address[{}], overall[{}], required[{}]",
          md.tick, tx.from, balance.overall, list.amt
        ))
        .into(),
      );
    }

    let now = unix_now();
    let mp_tx = MarketPlaceTx {
      chain: CHAIN_LITERAL.to_string(),
      protocol: PROTOCOL_LITERAL.to_string(),
      op: md.operate.clone(),
      tick: tick_name,
      block_number: block.number,
      tx_hash: tx.hash.to_lowercase(),
      list_address: tx.from.to_lowercase(),
      buy_address: String::new(),
      proxy_pay_address: String::new(),
      mp_address: list.mp.to_lowercase(),
      amt: list.amt,
      value: list.value,
      md_content: md.data.clone(),
      process_status: 0,
      created_at: now,
      updated_at: now,
    };
    self
      .store
      .insert_market_tx(&mp_tx)
      .map_err(Error::StoreError)?;

    Ok(list)
  }

  pub(super) fn process_buy(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    self.check_buy(block, tx, md)?;
    Ok(Vec::new())
  }

  fn check_buy(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Buy, Error<L, C>> {
    if !self.config.is_market_place(&tx.to) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "to address[{}] != mp address[{}]",
          tx.to, self.config.market_place_address
        ))
        .into(),
      );
    }
    self.check_metadata(md)?;

    let tick_name = md.tick.to_lowercase();
    if self.get_tick(&tick_name)?.is_none() {
      return Err(
        OpbrcError::TickNotFound(format!("inscription not deployed, tick[{}]", md.tick)).into(),
      );
    }

    let buy: Buy = decode_payload(&md.data)?;

    let Some(ext) = self.get_tick_ext(&tick_name)? else {
      return Err(OpbrcError::TickNotFound(format!("tick[{}] not found", md.tick)).into());
    };
    if ext.progress != 1 {
      return Err(
        OpbrcError::TickWrongProgress(format!(
          "tick[{}] progress[{}] != 1",
          md.tick, ext.progress
        ))
        .into(),
      );
    }

    if buy.p != PROTOCOL_LITERAL {
      return Err(
        OpbrcError::PayloadDecode(format!("protocol[{}] != protocol[{}]", buy.p, PROTOCOL_LITERAL))
          .into(),
      );
    }
    if !self.config.is_market_place(&buy.mp) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "mp[{}] != market place address[{}]",
          buy.mp, self.config.market_place_address
        ))
        .into(),
      );
    }

    check_amount_range(&buy.amt, "amt")?;
    check_amount_range(&buy.value, "value")?;
    check_tx_value_range(&tx.value)?;

    if buy.value != tx.value {
      return Err(
        OpbrcError::ValueMismatch(format!("value[{}] != tx value[{}]", buy.value, tx.value)).into(),
      );
    }

    let now = unix_now();
    let mp_tx = MarketPlaceTx {
      chain: CHAIN_LITERAL.to_string(),
      protocol: PROTOCOL_LITERAL.to_string(),
      op: md.operate.clone(),
      tick: tick_name,
      block_number: block.number,
      tx_hash: tx.hash.to_lowercase(),
      list_address: String::new(),
      buy_address: tx.from.to_lowercase(),
      proxy_pay_address: String::new(),
      mp_address: buy.mp.to_lowercase(),
      amt: buy.amt,
      value: buy.value,
      md_content: md.data.clone(),
      process_status: 0,
      created_at: now,
      updated_at: now,
    };
    self
      .store
      .insert_market_tx(&mp_tx)
      .map_err(Error::StoreError)?;

    Ok(buy)
  }

  pub(super) fn process_proxy_pay(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<Vec<TxResult>, Error<L, C>> {
    let transfer = self.check_proxy_pay(block, tx, md)?;

    Ok(vec![TxResult {
      md: md.clone(),
      block: block.clone(),
      tx: tx.clone(),
      effect: Effect::Transfer(transfer),
    }])
  }

  /// Proxy-pay closes a marketplace trade: the marketplace pays the lister
  /// out of band and the engine moves the listed amount to the buyer. Both
  /// linked txs must already be on record; otherwise the observation is
  /// kept with `process_status = 0` and rejected.
  fn check_proxy_pay(
    &self,
    block: &RpcBlock,
    tx: &RpcTransaction,
    md: &MetaData,
  ) -> Result<TransferEffect, Error<L, C>> {
    if !self.config.is_market_place(&tx.from) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "tx.from[{}] != mp address[{}]",
          tx.from, self.config.market_place_address
        ))
        .into(),
      );
    }
    self.check_metadata(md)?;

    let tick_name = md.tick.to_lowercase();
    if self.get_tick(&tick_name)?.is_none() {
      return Err(
        OpbrcError::TickNotFound(format!("inscription not deployed, tick[{}]", md.tick)).into(),
      );
    }

    let proxy_pay: ProxyPay = decode_payload(&md.data.to_lowercase())?;
    if proxy_pay.p != PROTOCOL_LITERAL {
      return Err(
        OpbrcError::PayloadDecode(format!(
          "protocol[{}] != protocol[{}]",
          proxy_pay.p, PROTOCOL_LITERAL
        ))
        .into(),
      );
    }
    if !self.config.is_market_place(&proxy_pay.mp) {
      return Err(
        OpbrcError::AddressMismatch(format!(
          "mp[{}] != market place address[{}]",
          proxy_pay.mp, self.config.market_place_address
        ))
        .into(),
      );
    }

    check_amount_range(&proxy_pay.amt, "amt")?;
    check_amount_range(&proxy_pay.value, "value")?;
    check_tx_value_range(&tx.value)?;

    let list_tx = self
      .store
      .get_market_tx(&proxy_pay.list_tx.to_lowercase())
      .map_err(Error::StoreError)?;
    if list_tx.is_none() {
      warn!("list tx [{}] not found", proxy_pay.list_tx);
    }
    let buy_tx = self
      .store
      .get_market_tx(&proxy_pay.buy_tx.to_lowercase())
      .map_err(Error::StoreError)?;
    if buy_tx.is_none() {
      warn!("buy tx [{}] not found", proxy_pay.buy_tx);
    }
    let process_status = i8::from(list_tx.is_some() && buy_tx.is_some());

    let now = unix_now();
    let mp_tx = MarketPlaceTx {
      chain: CHAIN_LITERAL.to_string(),
      protocol: PROTOCOL_LITERAL.to_string(),
      op: md.operate.clone(),
      tick: tick_name.clone(),
      block_number: block.number,
      tx_hash: tx.hash.to_lowercase(),
      list_address: String::new(),
      buy_address: String::new(),
      proxy_pay_address: tx.from.to_lowercase(),
      mp_address: proxy_pay.mp.to_lowercase(),
      amt: proxy_pay.amt,
      value: proxy_pay.value,
      md_content: md.data.clone(),
      process_status,
      created_at: now,
      updated_at: now,
    };
    self
      .store
      .insert_market_tx(&mp_tx)
      .map_err(Error::StoreError)?;

    let (Some(list_tx), Some(buy_tx)) = (list_tx, buy_tx) else {
      return Err(
        OpbrcError::LinkageMissing(format!(
          "listTx [{}] / buyTx [{}] not found",
          proxy_pay.list_tx, proxy_pay.buy_tx
        ))
        .into(),
      );
    };

    let Some(balance) = self
      .cache
      .get_balance(PROTOCOL_LITERAL, &tick_name, &list_tx.list_address)
      .map_err(Error::CacheError)?
    else {
      return Err(
        OpbrcError::BalanceInsufficient(format!(
          "sender balance record not exist, tick[{}], address[{}]",
          md.tick, list_tx.list_address
        ))
        .into(),
      );
    };
    if balance.overall < proxy_pay.amt {
      return Err(
        OpbrcError::BalanceInsufficient(format!(
          "sender balance not enough, tick[{}], address[{}], balance[{}], amt[{}]",
          md.tick, list_tx.list_address, balance.overall, proxy_pay.amt
        ))
        .into(),
      );
    }

    Ok(TransferEffect {
      sender: list_tx.list_address,
      receives: vec![Receive {
        address: buy_tx.buy_address,
        amount: proxy_pay.amt,
      }],
    })
  }

  fn check_metadata(&self, md: &MetaData) -> Result<(), Error<L, C>> {
    if md.tick.is_empty() || md.protocol != PROTOCOL_LITERAL {
      return Err(
        OpbrcError::PayloadDecode(format!(
          "protocol[{}] / tick[{}] invalid",
          md.protocol, md.tick
        ))
        .into(),
      );
    }
    Ok(())
  }
}

/// Payload amounts must have an integer part strictly inside `(0, 2^63)`;
/// the fractional part plays no role in the bound.
fn check_amount_range(n: &Num, what: &str) -> Result<(), OpbrcError> {
  let int = n.int_part();
  if n.is_sign_negative() || int <= 0 || int > i64::MAX as i128 {
    return Err(OpbrcError::AmountOutOfRange(format!(
      "{what}[{n}] out of range"
    )));
  }
  Ok(())
}

/// Native tx value may be zero but must not exceed `2^63`.
fn check_tx_value_range(n: &Num) -> Result<(), OpbrcError> {
  if n.int_part() > i64::MAX as i128 {
    return Err(OpbrcError::AmountOutOfRange(format!(
      "tx value[{n}] out of range"
    )));
  }
  Ok(())
}
