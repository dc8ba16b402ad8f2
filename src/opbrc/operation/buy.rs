use crate::opbrc::Num;
use serde::{Deserialize, Serialize};

// eg {"p":"opbrc","op":"buy","tick":"obrc","list_tx":"0x536e…","amt":"10000000","value":"750000000000000000","mp":"0x65efdd09dcbf0c6d769372dd07f8eb3f963f4a2d"}
#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Buy {
  pub p: String,
  pub op: String,
  pub tick: String,
  pub list_tx: String,
  pub amt: Num,
  pub value: Num,
  pub mp: String,
}
