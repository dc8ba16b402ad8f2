use crate::opbrc::Num;
use serde::{Deserialize, Serialize};

// eg {"p":"opbrc","op":"list","tick":"obrc","amt":"100000000","value":"3150000000000000000","mp":"0x65efdd09dcbf0c6d769372dd07f8eb3f963f4a2d"}
#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct List {
  pub p: String,
  pub op: String,
  pub tick: String,
  pub amt: Num,
  pub value: Num,
  pub mp: String,
}
