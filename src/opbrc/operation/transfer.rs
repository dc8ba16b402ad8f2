use crate::opbrc::Num;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Transfer {
  pub p: String,
  pub op: String,
  pub tick: String,
  pub to: Vec<ToItem>,
}

#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToItem {
  pub recv: String,
  pub amt: Num,
}
