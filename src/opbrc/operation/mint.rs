use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Mint {
  pub p: String,
  pub op: String,
  pub tick: String,
}
