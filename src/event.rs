use crate::{
  chain::{MetaData, RpcBlock, RpcTransaction},
  opbrc::Num,
};
use serde::{Deserialize, Serialize};

/// One ledger effect produced by validation or settlement, together with
/// the triple it originated from. Settlement emits synthetic triples for
/// the deployer awards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxResult {
  pub md: MetaData,
  pub block: RpcBlock,
  pub tx: RpcTransaction,
  pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
  Deploy(DeployEffect),
  Mint(MintEffect),
  Transfer(TransferEffect),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployEffect {
  pub name: String,
  pub max_supply: Num,
  pub mint_limit: Num,
  pub decimal: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintEffect {
  pub minter: String,
  pub amount: Num,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEffect {
  pub sender: String,
  pub receives: Vec<Receive>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receive {
  pub address: String,
  pub amount: Num,
}
