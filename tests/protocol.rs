use opbrc_indexer::{
  opbrc::types::{Balance, Inscription, InscriptionStats},
  CacheReadOnly, ChainConfig, DataStore, DataStoreReadOnly, Effect, Error, MetaData, Num,
  OpbrcError, Protocol, RpcBlock, RpcTransaction,
};
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const TREASURY: &str = "0x1111111111111111111111111111111111111111";
const MARKET_PLACE: &str = "0x2222222222222222222222222222222222222222";
const ADDR_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const ADDR_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const ADDR_C: &str = "0xcccccccccccccccccccccccccccccccccccccccc";
const ADDR_D: &str = "0xdddddddddddddddddddddddddddddddddddddddd";

#[derive(Debug, Default)]
struct CacheInner {
  inscriptions: HashMap<String, Inscription>,
  stats: HashMap<String, InscriptionStats>,
  balances: HashMap<(String, String), Balance>,
}

/// Stand-in for the downstream bookkeeping caches. Tests mutate it through
/// a shared handle to mimic the ledger applying emitted results.
#[derive(Debug, Default, Clone)]
struct TestCache {
  inner: Arc<Mutex<CacheInner>>,
}

impl TestCache {
  fn put_inscription(&self, inscription: Inscription) {
    let mut inner = self.inner.lock().unwrap();
    inner
      .inscriptions
      .insert(inscription.tick.to_lowercase(), inscription);
  }

  fn put_stats(&self, tick: &str, minted: Num) {
    let mut inner = self.inner.lock().unwrap();
    inner
      .stats
      .insert(tick.to_lowercase(), InscriptionStats { minted });
  }

  fn put_balance(&self, tick: &str, address: &str, overall: Num) {
    let mut inner = self.inner.lock().unwrap();
    inner.balances.insert(
      (tick.to_lowercase(), address.to_lowercase()),
      Balance {
        available: overall,
        overall,
      },
    );
  }
}

impl CacheReadOnly for TestCache {
  type Error = Infallible;

  fn get_inscription(&self, _protocol: &str, tick: &str) -> Result<Option<Inscription>, Infallible> {
    Ok(
      self
        .inner
        .lock()
        .unwrap()
        .inscriptions
        .get(&tick.to_lowercase())
        .cloned(),
    )
  }

  fn get_inscription_stats(
    &self,
    _protocol: &str,
    tick: &str,
  ) -> Result<Option<InscriptionStats>, Infallible> {
    Ok(
      self
        .inner
        .lock()
        .unwrap()
        .stats
        .get(&tick.to_lowercase())
        .cloned(),
    )
  }

  fn get_balance(
    &self,
    _protocol: &str,
    tick: &str,
    address: &str,
  ) -> Result<Option<Balance>, Infallible> {
    Ok(
      self
        .inner
        .lock()
        .unwrap()
        .balances
        .get(&(tick.to_lowercase(), address.to_lowercase()))
        .cloned(),
    )
  }
}

fn config() -> ChainConfig {
  serde_json::from_str(&format!(
    r##"{{
  "treasury_address": "{TREASURY}",
  "market_place_address": "{MARKET_PLACE}",
  "register_fee": {{ "2": "64", "3": "16", "4": "8", "5": "4" }}
}}"##
  ))
  .unwrap()
}

fn block(number: u64) -> RpcBlock {
  RpcBlock {
    number,
    hash: format!("0xb{number:06}"),
    timestamp: 1_700_000_000 + number,
  }
}

fn tx(number: u64, index: u32, from: &str, to: &str, value: &str) -> RpcTransaction {
  RpcTransaction {
    block_number: number,
    tx_index: index,
    hash: format!("0xt{number:06}{index:04}"),
    from: from.to_string(),
    to: to.to_string(),
    value: Num::from_str(value).unwrap(),
  }
}

fn md(operate: &str, tick: &str, data: String) -> MetaData {
  MetaData {
    chain: "opbnb".to_string(),
    protocol: "opbrc".to_string(),
    operate: operate.to_string(),
    tick: tick.to_string(),
    data,
  }
}

fn register_md(tick: &str) -> MetaData {
  md(
    "register",
    &tick.to_lowercase(),
    format!(r##"{{"p":"opbrc","op":"register","tick":"{tick}"}}"##),
  )
}

fn deploy_md(tick: &str, max: u64, mspan: u64, sm: u64, mcount: u64, cost: u64, dr: &str) -> MetaData {
  md(
    "deploy",
    tick,
    format!(
      r##"{{"p":"opbrc","op":"deploy","tick":"{tick}","max":"{max}","mspan":"{mspan}","sm":"{sm}","mcount":"{mcount}","cost":"{cost}","dr":"{dr}"}}"##
    ),
  )
}

fn mint_md(tick: &str) -> MetaData {
  md(
    "mint",
    tick,
    format!(r##"{{"p":"opbrc","op":"mint","tick":"{tick}"}}"##),
  )
}

type TestProtocol = Protocol<DataStore, TestCache>;

/// Registers and deploys `tick`, then mirrors the deploy into the
/// inscription cache the way the downstream ledger would.
fn deploy_tick(
  protocol: &TestProtocol,
  cache: &TestCache,
  tick: &str,
  max: u64,
  mspan: u64,
  sm: u64,
  mcount: u64,
  cost: u64,
) {
  let register_block = block(900);
  let register_tx = tx(900, 0, ADDR_A, TREASURY, "4000000000000000000");
  protocol
    .parse(&register_block, &register_tx, &register_md(tick))
    .unwrap();

  let deploy_block = block(1000);
  let deploy_tx = tx(1000, 0, ADDR_A, TREASURY, "0");
  let results = protocol
    .parse(
      &deploy_block,
      &deploy_tx,
      &deploy_md(tick, max, mspan, sm, mcount, cost, "0"),
    )
    .unwrap();
  assert_eq!(results.len(), 1);

  cache.put_inscription(Inscription {
    tick: tick.to_string(),
    origin_tick: tick.to_string(),
    total_supply: Num::from(max),
    deploy_by: ADDR_A.to_string(),
    mint_limit: mcount,
  });
  cache.put_stats(tick, Num::zero());
}

fn mint(protocol: &TestProtocol, tick: &str, number: u64, index: u32, from: &str, value: &str) {
  let results = protocol
    .parse(&block(number), &tx(number, index, from, TREASURY, value), &mint_md(tick))
    .unwrap();
  assert!(results.is_empty());
}

/// Sums a settlement's mint emissions and advances the stats cache, the
/// way the ledger would after applying the results.
fn apply_mints(cache: &TestCache, tick: &str, results: &[opbrc_indexer::TxResult]) -> Num {
  let mut total = Num::zero();
  for result in results {
    if let Effect::Mint(mint) = &result.effect {
      total = total.checked_add(&mint.amount).unwrap();
    }
  }
  let minted = cache
    .get_inscription_stats("opbrc", tick)
    .unwrap()
    .map(|stats| stats.minted)
    .unwrap_or_default();
  cache.put_stats(tick, minted.checked_add(&total).unwrap());
  total
}

#[test]
fn register_reserves_tick() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache).unwrap();

  let results = protocol
    .parse(
      &block(900),
      &tx(900, 0, &ADDR_A.to_uppercase(), TREASURY, "4000000000000000000"),
      &register_md("Legend"),
    )
    .unwrap();
  assert!(results.is_empty());

  let ext = protocol
    .store()
    .get_inscription_ext("legend")
    .unwrap()
    .unwrap();
  assert_eq!(ext.registry_address, ADDR_A);
  assert_eq!(ext.origin_tick, "Legend");
  assert_eq!(ext.registry_block_number, 900);
  assert_eq!(ext.progress, 0);
}

#[test]
fn register_rejects_short_tick_and_low_fee() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache).unwrap();

  let result = protocol.parse(
    &block(900),
    &tx(900, 0, ADDR_A, TREASURY, "4000000000000000000"),
    &register_md("x"),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::PayloadDecode(_)))
  ));

  // length 3 costs 16 tokens, 4 is not enough
  let result = protocol.parse(
    &block(900),
    &tx(900, 0, ADDR_A, TREASURY, "4000000000000000000"),
    &register_md("abc"),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::FeeInsufficient(_)))
  ));
}

#[test]
fn register_rejects_duplicate() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache).unwrap();

  protocol
    .parse(
      &block(900),
      &tx(900, 0, ADDR_A, TREASURY, "4000000000000000000"),
      &register_md("legend"),
    )
    .unwrap();
  let result = protocol.parse(
    &block(901),
    &tx(901, 0, ADDR_B, TREASURY, "4000000000000000000"),
    &register_md("legend"),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::DuplicateTick(_)))
  ));
}

#[test]
fn deploy_populates_parameters() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 10_000_000_000_000);

  let ext = protocol
    .store()
    .get_inscription_ext("legend")
    .unwrap()
    .unwrap();
  assert_eq!(ext.start_block_number, 1000);
  assert_eq!(ext.settled_block_number, 1000);
  assert_eq!(ext.end_block_number, 4600);
  assert_eq!(ext.avg_settle_qty, 833);
  assert_eq!(ext.mcount, 100);
  assert_eq!(ext.cost, 10_000_000_000_000);
  assert_eq!(ext.progress, 0);
}

#[test]
fn deploy_requires_registrant() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache).unwrap();

  protocol
    .parse(
      &block(900),
      &tx(900, 0, ADDR_A, TREASURY, "4000000000000000000"),
      &register_md("legend"),
    )
    .unwrap();
  let result = protocol.parse(
    &block(1000),
    &tx(1000, 0, ADDR_B, TREASURY, "0"),
    &deploy_md("legend", 10000, 1, 5, 100, 0, "0"),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::AddressMismatch(_)))
  ));
}

#[test]
fn deploy_rejects_mixed_dr_cost_signs() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache).unwrap();

  protocol
    .parse(
      &block(900),
      &tx(900, 0, ADDR_A, TREASURY, "4000000000000000000"),
      &register_md("legend"),
    )
    .unwrap();
  // dr > 0 with cost == 0
  let result = protocol.parse(
    &block(1000),
    &tx(1000, 0, ADDR_A, TREASURY, "0"),
    &deploy_md("legend", 10000, 1, 5, 100, 0, "0.1"),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::AmountOutOfRange(_)))
  ));
  // dr == 0 with cost > 0 passes
  let results = protocol
    .parse(
      &block(1000),
      &tx(1000, 0, ADDR_A, TREASURY, "0"),
      &deploy_md("legend", 10000, 1, 5, 100, 10_000_000_000_000, "0"),
    )
    .unwrap();
  assert_eq!(results.len(), 1);
}

#[test]
fn mint_window_splits_quota() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 10_000_000_000_000);

  mint(&protocol, "legend", 1050, 0, ADDR_B, "10000000000000");
  mint(&protocol, "legend", 1100, 0, ADDR_C, "10000000000000");
  mint(&protocol, "legend", 1200, 0, ADDR_B, "10000000000000");

  let results = protocol.settle(&block(1300)).unwrap();
  assert_eq!(results.len(), 3);
  let expected = [(ADDR_B, 277u64), (ADDR_C, 277), (ADDR_B, 277)];
  for (result, (minter, amount)) in results.iter().zip(expected) {
    let Effect::Mint(mint) = &result.effect else {
      panic!("expected mint effect");
    };
    assert_eq!(mint.minter, minter);
    assert_eq!(mint.amount, Num::from(amount));
  }
  // emissions preserve the buffered txs
  assert_eq!(results[0].tx.hash, "0xt0010500000");
  assert_eq!(results[1].tx.hash, "0xt0011000000");

  let ext = protocol
    .store()
    .get_inscription_ext("legend")
    .unwrap()
    .unwrap();
  assert_eq!(ext.settled_block_number, 1300);
}

#[test]
fn empty_window_awards_deployer() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 10_000_000_000_000);

  let results = protocol.settle(&block(1300)).unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].tx.hash, "auto_settle_1300");
  let Effect::Mint(mint) = &results[0].effect else {
    panic!("expected mint effect");
  };
  assert_eq!(mint.minter, ADDR_A);
  assert_eq!(mint.amount, Num::from(833u64));
}

#[test]
fn per_address_cap_excludes_extra_mints() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 1, 10_000_000_000_000);

  mint(&protocol, "legend", 1050, 0, ADDR_B, "10000000000000");
  mint(&protocol, "legend", 1060, 0, ADDR_C, "10000000000000");
  mint(&protocol, "legend", 1070, 0, ADDR_B, "10000000000000");

  let results = protocol.settle(&block(1300)).unwrap();
  // the second mint of 0xB bumps the counter past the cap but is excluded
  assert_eq!(results.len(), 2);
  for result in &results {
    let Effect::Mint(mint) = &result.effect else {
      panic!("expected mint effect");
    };
    assert_eq!(mint.amount, Num::from(416u64));
  }

  let times: HashMap<String, u64> = protocol
    .store()
    .list_address_mint_times()
    .unwrap()
    .into_iter()
    .map(|row| (row.address, row.mint_times))
    .collect();
  assert_eq!(times[ADDR_B], 2);
  assert_eq!(times[ADDR_C], 1);

  // further windows: 0xB no longer contributes, quota falls to the deployer
  mint(&protocol, "legend", 1400, 0, ADDR_B, "10000000000000");
  let results = protocol.settle(&block(1600)).unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].tx.hash, "auto_settle_1600");
}

#[test]
fn finalisation_awards_residual_and_flips_progress() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  // two windows of 5000 each
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 30, 100, 10_000_000_000_000);

  mint(&protocol, "legend", 1050, 0, ADDR_B, "10000000000000");
  mint(&protocol, "legend", 1100, 0, ADDR_C, "10000000000000");
  mint(&protocol, "legend", 1200, 0, ADDR_B, "10000000000000");

  let results = protocol.settle(&block(2800)).unwrap();
  assert_eq!(results.len(), 3);
  let settled = apply_mints(&cache, "legend", &results);
  assert_eq!(settled, Num::from(4998u64)); // 3 x 1666

  // nothing minted in the last window, end block reached
  let results = protocol.settle(&block(4600)).unwrap();
  assert_eq!(results.len(), 2);
  assert_eq!(results[0].tx.hash, "auto_settle_4600");
  let Effect::Mint(window_award) = &results[0].effect else {
    panic!("expected mint effect");
  };
  assert_eq!(window_award.amount, Num::from(5000u64));
  assert_eq!(results[1].tx.hash, "mint_finish_auto_settle_4600");
  let Effect::Mint(residual) = &results[1].effect else {
    panic!("expected mint effect");
  };
  assert_eq!(residual.minter, ADDR_A);
  // 10000 - 4998 already minted - 5000 window award
  assert_eq!(residual.amount, Num::from(2u64));

  let ext = protocol
    .store()
    .get_inscription_ext("legend")
    .unwrap()
    .unwrap();
  assert_eq!(ext.progress, 1);
  assert!(protocol.store().list_not_settled_exts().unwrap().is_empty());
}

#[test]
fn quota_conservation_across_all_windows() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 30, 100, 10_000_000_000_000);

  mint(&protocol, "legend", 1050, 0, ADDR_B, "10000000000000");
  mint(&protocol, "legend", 1100, 0, ADDR_C, "10000000000000");
  mint(&protocol, "legend", 1200, 0, ADDR_B, "10000000000000");
  let first = protocol.settle(&block(2800)).unwrap();
  let mut total = apply_mints(&cache, "legend", &first);

  mint(&protocol, "legend", 3000, 0, ADDR_D, "10000000000000");
  let last = protocol.settle(&block(4600)).unwrap();
  total = total.checked_add(&apply_mints(&cache, "legend", &last)).unwrap();

  assert_eq!(total, Num::from(10000u64));
}

#[test]
fn rejected_mint_leaves_no_trace() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 10_000_000_000_000);

  // underpaying and mis-addressed mints are swallowed, not surfaced
  let results = protocol
    .parse(
      &block(1050),
      &tx(1050, 0, ADDR_B, TREASURY, "1"),
      &mint_md("legend"),
    )
    .unwrap();
  assert!(results.is_empty());
  let results = protocol
    .parse(
      &block(1060),
      &tx(1060, 0, ADDR_B, ADDR_C, "10000000000000"),
      &mint_md("legend"),
    )
    .unwrap();
  assert!(results.is_empty());

  mint(&protocol, "legend", 1100, 0, ADDR_C, "10000000000000");

  let results = protocol.settle(&block(1300)).unwrap();
  assert_eq!(results.len(), 1);
  let Effect::Mint(mint) = &results[0].effect else {
    panic!("expected mint effect");
  };
  assert_eq!(mint.minter, ADDR_C);
  assert_eq!(mint.amount, Num::from(833u64));

  let times = protocol.store().list_address_mint_times().unwrap();
  assert_eq!(times.len(), 1);
  assert_eq!(times[0].address, ADDR_C);
}

#[test]
fn recovery_replays_buffer_identically() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("opbrc.redb");
  let cache = TestCache::default();

  // uninterrupted run
  let baseline = {
    let protocol =
      Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
    deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 10_000_000_000_000);
    mint(&protocol, "legend", 1050, 0, ADDR_B, "10000000000000");
    mint(&protocol, "legend", 1100, 0, ADDR_C, "10000000000000");
    mint(&protocol, "legend", 1200, 1, ADDR_B, "10000000000000");
    protocol.settle(&block(1300)).unwrap()
  };

  // interrupted run over a durable store: stop after the mints land
  let cache = TestCache::default();
  {
    let protocol =
      Protocol::new(config(), DataStore::open(&path).unwrap(), cache.clone()).unwrap();
    deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 10_000_000_000_000);
    mint(&protocol, "legend", 1050, 0, ADDR_B, "10000000000000");
    mint(&protocol, "legend", 1100, 0, ADDR_C, "10000000000000");
    mint(&protocol, "legend", 1200, 1, ADDR_B, "10000000000000");
  }
  let protocol = Protocol::new(config(), DataStore::open(&path).unwrap(), cache).unwrap();
  let replayed = protocol.settle(&block(1300)).unwrap();

  assert_eq!(baseline, replayed);
  assert_eq!(
    protocol
      .store()
      .get_inscription_ext("legend")
      .unwrap()
      .unwrap()
      .settled_block_number,
    1300
  );
  // the settled window's rows are gone
  assert!(protocol.store().load_temp_txs("legend", 1001, 1300).unwrap().is_empty());
}

#[test]
fn transfer_filters_and_allocates_greedily() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 0);
  cache.put_balance("legend", ADDR_B, Num::from(100u64));

  let data = format!(
    r##"{{"p":"opbrc","op":"transfer","tick":"legend","to":[{{"recv":"{ADDR_C}","amt":"60"}},{{"recv":"bogus","amt":"10"}},{{"recv":"{ADDR_D}","amt":"50"}},{{"recv":"{ADDR_D}","amt":"40"}}]}}"##
  );
  let results = protocol
    .parse(
      &block(2000),
      &tx(2000, 0, ADDR_B, TREASURY, "0"),
      &md("transfer", "legend", data),
    )
    .unwrap();

  assert_eq!(results.len(), 1);
  let Effect::Transfer(transfer) = &results[0].effect else {
    panic!("expected transfer effect");
  };
  assert_eq!(transfer.sender, ADDR_B);
  // 60 fits, bogus address dropped, 50 no longer covered, 40 fits
  assert_eq!(transfer.receives.len(), 2);
  assert_eq!(transfer.receives[0].address, ADDR_C);
  assert_eq!(transfer.receives[0].amount, Num::from(60u64));
  assert_eq!(transfer.receives[1].address, ADDR_D);
  assert_eq!(transfer.receives[1].amount, Num::from(40u64));
}

#[test]
fn transfer_requires_sender_balance() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 0);

  let data = format!(
    r##"{{"p":"opbrc","op":"transfer","tick":"legend","to":[{{"recv":"{ADDR_C}","amt":"60"}}]}}"##
  );
  let result = protocol.parse(
    &block(2000),
    &tx(2000, 0, ADDR_B, TREASURY, "0"),
    &md("transfer", "legend", data),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::BalanceInsufficient(_)))
  ));
}

/// Drives a tick to `progress == 1` so marketplace ops become legal.
fn finalise_tick(protocol: &TestProtocol, cache: &TestCache, tick: &str) {
  deploy_tick(protocol, cache, tick, 10000, 1, 30, 100, 10_000_000_000_000);
  let first = protocol.settle(&block(2800)).unwrap();
  apply_mints(cache, tick, &first);
  let last = protocol.settle(&block(4600)).unwrap();
  apply_mints(cache, tick, &last);
}

#[test]
fn marketplace_roundtrip_list_buy_proxy_pay() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  finalise_tick(&protocol, &cache, "legend");
  cache.put_balance("legend", ADDR_B, Num::from(10000u64));

  let list_tx = tx(5000, 0, ADDR_B, TREASURY, "0");
  let list_data = format!(
    r##"{{"p":"opbrc","op":"list","tick":"legend","amt":"100","value":"3000000000000000000","mp":"{MARKET_PLACE}"}}"##
  );
  let results = protocol
    .parse(&block(5000), &list_tx, &md("list", "legend", list_data))
    .unwrap();
  assert!(results.is_empty());
  let row = protocol
    .store()
    .get_market_tx(&list_tx.hash)
    .unwrap()
    .unwrap();
  assert_eq!(row.list_address, ADDR_B);
  assert_eq!(row.process_status, 0);

  let buy_tx = tx(5001, 0, ADDR_D, MARKET_PLACE, "3000000000000000000");
  let buy_data = format!(
    r##"{{"p":"opbrc","op":"buy","tick":"legend","list_tx":"{}","amt":"100","value":"3000000000000000000","mp":"{MARKET_PLACE}"}}"##,
    list_tx.hash
  );
  let results = protocol
    .parse(&block(5001), &buy_tx, &md("buy", "legend", buy_data))
    .unwrap();
  assert!(results.is_empty());

  let proxy_tx = tx(5002, 0, MARKET_PLACE, ADDR_B, "3000000000000000000");
  let proxy_data = format!(
    r##"{{"p":"opbrc","op":"proxy_pay","mp":"{MARKET_PLACE}","tick":"legend","amt":"100","value":"3000000000000000000","fee":"0","list_tx":"{}","buy_tx":"{}","pt_tx":"0xff"}}"##,
    list_tx.hash, buy_tx.hash
  );
  let results = protocol
    .parse(&block(5002), &proxy_tx, &md("proxy_pay", "legend", proxy_data))
    .unwrap();
  assert_eq!(results.len(), 1);
  let Effect::Transfer(transfer) = &results[0].effect else {
    panic!("expected transfer effect");
  };
  assert_eq!(transfer.sender, ADDR_B);
  assert_eq!(transfer.receives.len(), 1);
  assert_eq!(transfer.receives[0].address, ADDR_D);
  assert_eq!(transfer.receives[0].amount, Num::from(100u64));

  let row = protocol
    .store()
    .get_market_tx(&proxy_tx.hash)
    .unwrap()
    .unwrap();
  assert_eq!(row.process_status, 1);
}

#[test]
fn list_rejected_while_minting() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  deploy_tick(&protocol, &cache, "legend", 10000, 1, 5, 100, 0);
  cache.put_balance("legend", ADDR_B, Num::from(10000u64));

  let list_data = format!(
    r##"{{"p":"opbrc","op":"list","tick":"legend","amt":"100","value":"3000000000000000000","mp":"{MARKET_PLACE}"}}"##
  );
  let result = protocol.parse(
    &block(2000),
    &tx(2000, 0, ADDR_B, TREASURY, "0"),
    &md("list", "legend", list_data),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::TickWrongProgress(_)))
  ));
}

#[test]
fn buy_requires_exact_value() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  finalise_tick(&protocol, &cache, "legend");

  let buy_data = format!(
    r##"{{"p":"opbrc","op":"buy","tick":"legend","list_tx":"0x01","amt":"100","value":"3000000000000000000","mp":"{MARKET_PLACE}"}}"##
  );
  let result = protocol.parse(
    &block(5001),
    &tx(5001, 0, ADDR_D, MARKET_PLACE, "2999999999999999999"),
    &md("buy", "legend", buy_data),
  );
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::ValueMismatch(_)))
  ));
}

#[test]
fn proxy_pay_without_linkage_is_kept_pending() {
  let cache = TestCache::default();
  let protocol = Protocol::new(config(), DataStore::memory().unwrap(), cache.clone()).unwrap();
  finalise_tick(&protocol, &cache, "legend");

  let proxy_tx = tx(5002, 0, MARKET_PLACE, ADDR_B, "3000000000000000000");
  let proxy_data = format!(
    r##"{{"p":"opbrc","op":"proxy_pay","mp":"{MARKET_PLACE}","tick":"legend","amt":"100","value":"3000000000000000000","fee":"0","list_tx":"0x01","buy_tx":"0x02","pt_tx":"0x03"}}"##
  );
  let result = protocol.parse(&block(5002), &proxy_tx, &md("proxy_pay", "legend", proxy_data));
  assert!(matches!(
    result,
    Err(Error::DataVerificationFailed(OpbrcError::LinkageMissing(_)))
  ));

  // the observation is recorded anyway, flagged pending
  let row = protocol
    .store()
    .get_market_tx(&proxy_tx.hash)
    .unwrap()
    .unwrap();
  assert_eq!(row.process_status, 0);
}
