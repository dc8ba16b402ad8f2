use crate::opbrc::num::Num;
use once_cell::sync::Lazy;
use regex::Regex;

pub const PROTOCOL_LITERAL: &str = "opbrc";
pub const CHAIN_LITERAL: &str = "opbnb";

pub const OPERATE_REGISTER: &str = "register";
pub const OPERATE_DEPLOY: &str = "deploy";
pub const OPERATE_MINT: &str = "mint";
pub const OPERATE_TRANSFER: &str = "transfer";
pub const OPERATE_LIST: &str = "list";
pub const OPERATE_BUY: &str = "buy";
pub const OPERATE_PROXY_PAY: &str = "proxy_pay";

pub const MAX_DECIMAL_WIDTH: u8 = 18;
pub const MIN_TICK_LEN: usize = 2;
pub const MAX_FEE_TICK_LEN: usize = 5;

/// One-second blocks: a settlement-interval minute spans 60 blocks and a
/// mint-span hour spans 3600.
pub const BLOCKS_PER_MINUTE: u64 = 60;
pub const BLOCKS_PER_HOUR: u64 = 3600;

pub static BIGDECIMAL_TEN: Lazy<Num> = Lazy::new(|| Num::from(10u64));

static ETH_ADDRESS_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new("^0x[0-9a-fA-F]{40}$").unwrap());

pub fn is_valid_eth_address(address: &str) -> bool {
  ETH_ADDRESS_REGEX.is_match(address)
}
