use crate::opbrc::{params::MAX_FEE_TICK_LEN, Num};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Chain-level addresses and the tick registration fee schedule.
///
/// `register_fee` maps tick length (capped at 5) to the fee in whole
/// tokens, pre-shift; the validator multiplies by `10^18` to get wei.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
  pub treasury_address: String,
  pub market_place_address: String,
  pub register_fee: BTreeMap<u8, Num>,
}

impl ChainConfig {
  /// Fee in whole tokens for a tick of `tick_len` characters. A length
  /// with no configured entry costs nothing.
  pub fn register_fee(&self, tick_len: usize) -> Num {
    let len = tick_len.min(MAX_FEE_TICK_LEN) as u8;
    self.register_fee.get(&len).copied().unwrap_or_default()
  }

  pub(crate) fn is_treasury(&self, address: &str) -> bool {
    address.eq_ignore_ascii_case(&self.treasury_address)
  }

  pub(crate) fn is_market_place(&self, address: &str) -> bool {
    address.eq_ignore_ascii_case(&self.market_place_address)
  }
}
