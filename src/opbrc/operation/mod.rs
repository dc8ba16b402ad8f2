mod buy;
mod deploy;
mod list;
mod mint;
mod proxy_pay;
mod register;
mod transfer;

pub use self::{
  buy::Buy,
  deploy::Deploy,
  list::List,
  mint::Mint,
  proxy_pay::ProxyPay,
  register::Register,
  transfer::{ToItem, Transfer},
};

use crate::opbrc::error::OpbrcError;
use serde::de::DeserializeOwned;

/// Decodes one operation payload out of `md.data`. Missing fields fall
/// back to their defaults the way a Go `json.Unmarshal` would leave zero
/// values, so the per-operation rules decide what is actually required.
pub(crate) fn decode_payload<T: DeserializeOwned>(data: &str) -> Result<T, OpbrcError> {
  serde_json::from_str(data)
    .map_err(|e| OpbrcError::PayloadDecode(format!("json decode err: {e}, data[{data}]")))
}
