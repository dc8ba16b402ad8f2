use crate::opbrc::Num;
use serde::{Deserialize, Serialize};

/// Deploy publishes the mint parameters for a registered tick:
/// `max` total supply, `mspan` mint duration in hours, `sm` settlement
/// interval in minutes, `mcount` lifetime mints per address, `cost`
/// minimum wei per mint and `dr` deployer revenue share.
#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Deploy {
  pub p: String,
  pub op: String,
  pub tick: String,
  pub max: Num,
  pub mspan: Num,
  pub sm: Num,
  pub mcount: Num,
  pub cost: Num,
  pub dr: Num,
}
