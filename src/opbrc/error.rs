use crate::opbrc::datastore::{CacheReadOnly, DataStoreReadOnly};
use serde::{Deserialize, Serialize};

/// Protocol-level rejection. Every kind carries a human-readable context
/// and maps to a stable negative code via [`OpbrcError::code`].
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum OpbrcError {
  #[error("address mismatch: {0}")]
  AddressMismatch(String),

  #[error("tick not found: {0}")]
  TickNotFound(String),

  #[error("tick progress mismatch: {0}")]
  TickWrongProgress(String),

  #[error("payload decode error: {0}")]
  PayloadDecode(String),

  #[error("amount out of range: {0}")]
  AmountOutOfRange(String),

  #[error("value mismatch: {0}")]
  ValueMismatch(String),

  #[error("register fee insufficient: {0}")]
  FeeInsufficient(String),

  #[error("duplicate tick: {0}")]
  DuplicateTick(String),

  #[error("balance insufficient: {0}")]
  BalanceInsufficient(String),

  #[error("marketplace linkage missing: {0}")]
  LinkageMissing(String),
}

impl OpbrcError {
  pub fn code(&self) -> i32 {
    match self {
      Self::AddressMismatch(_) => -14,
      Self::TickNotFound(_) => -11,
      Self::TickWrongProgress(_) => -10,
      Self::PayloadDecode(_) => -13,
      Self::AmountOutOfRange(_) => -17,
      Self::ValueMismatch(_) => -20,
      Self::FeeInsufficient(_) => -203,
      Self::DuplicateTick(_) => -202,
      Self::BalanceInsufficient(_) => -22,
      Self::LinkageMissing(_) => -21,
    }
  }
}

/// Envelope surfaced by [`Protocol::parse`] and [`Protocol::settle`].
///
/// Protocol rejections arrive wrapped in `DataVerificationFailed`; store
/// and cache failures carry the collaborator's own error and should be
/// treated as fatal by the caller.
///
/// [`Protocol::parse`]: crate::opbrc::Protocol::parse
/// [`Protocol::settle`]: crate::opbrc::Protocol::settle
#[derive(Debug, thiserror::Error)]
pub enum Error<L: DataStoreReadOnly, C: CacheReadOnly> {
  #[error("data verification failed: {0}")]
  DataVerificationFailed(OpbrcError),

  #[error("store error: {0}")]
  StoreError(<L as DataStoreReadOnly>::Error),

  #[error("cache error: {0}")]
  CacheError(<C as CacheReadOnly>::Error),
}

impl<L: DataStoreReadOnly, C: CacheReadOnly> From<OpbrcError> for Error<L, C> {
  fn from(e: OpbrcError) -> Self {
    Self::DataVerificationFailed(e)
  }
}
