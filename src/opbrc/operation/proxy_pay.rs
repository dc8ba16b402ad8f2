use crate::opbrc::Num;
use serde::{Deserialize, Serialize};

/// Marketplace-originated payout linking a prior `list` and `buy` by their
/// tx hashes; settles the trade as a transfer from lister to buyer.
#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyPay {
  pub p: String,
  pub op: String,
  pub mp: String,
  pub tick: String,
  pub amt: Num,
  pub value: Num,
  pub fee: Num,
  pub list_tx: String,
  pub buy_tx: String,
  pub pt_tx: String,
}
