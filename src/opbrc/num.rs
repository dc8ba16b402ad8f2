use crate::opbrc::error::OpbrcError;
use crate::opbrc::params::MAX_DECIMAL_WIDTH;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

/// Amount type for payload decimals and emitted quantities, 18 fractional
/// digits at most. Parsing through [`FromStr`] rejects negative values;
/// serde deserialization is permissive because sign checks belong to the
/// validators (`dr` may legitimately arrive negative and must be rejected
/// by the deploy rules, not at decode time).
#[derive(PartialEq, PartialOrd, Debug, Clone, Copy)]
pub struct Num(Decimal);

impl Num {
  pub fn zero() -> Self {
    Self(Decimal::ZERO)
  }

  pub fn is_zero(&self) -> bool {
    self.0.is_zero()
  }

  pub fn is_sign_negative(&self) -> bool {
    self.0.is_sign_negative()
  }

  /// Integer part, truncated toward zero. The mantissa of the backing
  /// decimal always fits an `i128`.
  pub fn int_part(&self) -> i128 {
    self.0.trunc().to_i128().unwrap_or_default()
  }

  pub fn checked_add(&self, other: &Num) -> Result<Self, OpbrcError> {
    Ok(Self(self.0.checked_add(other.0).ok_or_else(|| {
      OpbrcError::AmountOutOfRange(format!("checked_add overflow: {} + {}", self, other))
    })?))
  }

  pub fn checked_sub(&self, other: &Num) -> Result<Self, OpbrcError> {
    Ok(Self(self.0.checked_sub(other.0).ok_or_else(|| {
      OpbrcError::AmountOutOfRange(format!("checked_sub overflow: {} - {}", self, other))
    })?))
  }

  pub fn checked_mul(&self, other: &Num) -> Result<Self, OpbrcError> {
    Ok(Self(self.0.checked_mul(other.0).ok_or_else(|| {
      OpbrcError::AmountOutOfRange(format!("checked_mul overflow: {} * {}", self, other))
    })?))
  }

  pub fn checked_powu(&self, exp: u64) -> Result<Self, OpbrcError> {
    Ok(Self(self.0.checked_powu(exp).ok_or_else(|| {
      OpbrcError::AmountOutOfRange(format!("checked_powu overflow: {} ^ {}", self, exp))
    })?))
  }

}

impl Default for Num {
  fn default() -> Self {
    Self::zero()
  }
}

impl From<Decimal> for Num {
  fn from(num: Decimal) -> Self {
    Num(num)
  }
}

impl From<u64> for Num {
  fn from(n: u64) -> Self {
    Num(Decimal::from_u64(n).unwrap())
  }
}

impl From<u128> for Num {
  fn from(n: u128) -> Self {
    Num(Decimal::from_u128(n).unwrap())
  }
}

impl FromStr for Num {
  type Err = OpbrcError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let num =
      Decimal::from_str_radix(s, 10).map_err(|_| OpbrcError::AmountOutOfRange(s.to_string()))?;

    if num.is_sign_negative() {
      return Err(OpbrcError::AmountOutOfRange(s.to_string()));
    }
    if num.scale() > MAX_DECIMAL_WIDTH as u32 {
      return Err(OpbrcError::AmountOutOfRange(s.to_string()));
    }

    Ok(Self(num))
  }
}

impl Display for Num {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl Deref for Num {
  type Target = Decimal;
  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Serialize for Num {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

impl<'de> Deserialize<'de> for Num {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = if deserializer.is_human_readable() {
      // Payloads in the wild carry amounts both quoted and bare.
      let value = serde_json::Value::deserialize(deserializer)?;
      match &value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        other => {
          return Err(serde::de::Error::custom(format!(
            "invalid decimal: {other}"
          )))
        }
      }
    } else {
      // Binary formats only ever see what `serialize` wrote.
      String::deserialize(deserializer)?
    };
    Ok(Self(
      Decimal::from_str(&s).map_err(serde::de::Error::custom)?,
    ))
  }
}
