//! Fixed-precision balance arithmetic
//!
//! Amounts are 16-byte big-endian unsigned integers scaled by `10^DECIMALS`.
//! Every operation is pure and total: an overflow, underflow, zero divisor or
//! malformed buffer yields `None` (the invalid sentinel) instead of a wrapped
//! value or a panic. Callers translate `None` into a rejection of the
//! operation being applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width of an encoded balance
pub const BALANCE_BYTE_LENGTH: usize = 16;

/// Decimal exponent applied to every amount
pub const DECIMALS: u32 = 18;

/// Divisor used by [`Balance::percentage`]: `100.00%` in basis points
pub const PERCENT_SCALE: Balance = Balance(10_000);

const UNIT: u128 = 10u128.pow(DECIMALS);

/// Unsigned token amount in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Balance(u128);

impl Balance {
    /// The zero amount
    pub const ZERO: Balance = Balance(0);

    /// One whole token
    pub const ONE: Balance = Balance(UNIT);

    /// Wrap a raw base-unit value
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Raw base-unit value
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Whole tokens; every `u32` count fits
    pub const fn whole(tokens: u32) -> Self {
        Self(tokens as u128 * UNIT)
    }

    /// Whole tokens, `None` on overflow
    pub fn from_tokens(tokens: u64) -> Option<Self> {
        u128::from(tokens).checked_mul(UNIT).map(Self)
    }

    /// Decode a big-endian buffer of exactly [`BALANCE_BYTE_LENGTH`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let array: [u8; BALANCE_BYTE_LENGTH] = bytes.try_into().ok()?;
        Some(Self(u128::from_be_bytes(array)))
    }

    /// Big-endian encoding
    pub fn to_bytes(self) -> [u8; BALANCE_BYTE_LENGTH] {
        self.0.to_be_bytes()
    }

    /// Returns true for the zero amount
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn add(self, other: Balance) -> Option<Balance> {
        self.0.checked_add(other.0).map(Balance)
    }

    /// Checked subtraction; a negative result is invalid
    pub fn sub(self, other: Balance) -> Option<Balance> {
        self.0.checked_sub(other.0).map(Balance)
    }

    /// Checked multiplication of raw values.
    ///
    /// The full-width product must fit in 128 bits; a non-zero high half is
    /// rejected rather than truncated.
    pub fn mul(self, other: Balance) -> Option<Balance> {
        self.0.checked_mul(other.0).map(Balance)
    }

    /// Integer division of raw values, rounding toward zero
    pub fn div(self, divisor: Balance) -> Option<Balance> {
        self.0.checked_div(divisor.0).map(Balance)
    }

    /// `value * p / 10000`, where `p` is a two-decimal percentage in basis
    /// points (`7500` is `75.00%`)
    pub fn percentage(self, p: Balance) -> Option<Balance> {
        self.mul(p)?.div(PERCENT_SCALE)
    }

    /// Parse a decimal token amount such as `"0.03"` or `"1000"`
    pub fn parse_decimal(text: &str) -> Option<Balance> {
        let (whole, frac) = match text.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (text, ""),
        };
        if whole.is_empty() || frac.len() > DECIMALS as usize {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        if text.contains('.') && frac.is_empty() {
            return None;
        }

        let whole: u128 = whole.parse().ok()?;
        let frac_raw: u128 = if frac.is_empty() {
            0
        } else {
            let scale = 10u128.pow(DECIMALS - frac.len() as u32);
            frac.parse::<u128>().ok()?.checked_mul(scale)?
        };
        whole.checked_mul(UNIT)?.checked_add(frac_raw).map(Balance)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:018}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Balance {
    type Err = InvalidAmount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Balance::parse_decimal(s).ok_or(InvalidAmount)
    }
}

/// A decimal amount string could not be represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid token amount")]
pub struct InvalidAmount;

impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Balance::parse_decimal(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid token amount `{text}`")))
    }
}

fn lift2(
    a: &[u8],
    b: &[u8],
    op: impl FnOnce(Balance, Balance) -> Option<Balance>,
) -> Option<[u8; BALANCE_BYTE_LENGTH]> {
    op(Balance::from_bytes(a)?, Balance::from_bytes(b)?).map(Balance::to_bytes)
}

/// [`Balance::add`] over raw buffers
pub fn add_bytes(a: &[u8], b: &[u8]) -> Option<[u8; BALANCE_BYTE_LENGTH]> {
    lift2(a, b, Balance::add)
}

/// [`Balance::sub`] over raw buffers
pub fn sub_bytes(a: &[u8], b: &[u8]) -> Option<[u8; BALANCE_BYTE_LENGTH]> {
    lift2(a, b, Balance::sub)
}

/// [`Balance::mul`] over raw buffers
pub fn mul_bytes(a: &[u8], b: &[u8]) -> Option<[u8; BALANCE_BYTE_LENGTH]> {
    lift2(a, b, Balance::mul)
}

/// [`Balance::div`] over raw buffers
pub fn div_bytes(a: &[u8], b: &[u8]) -> Option<[u8; BALANCE_BYTE_LENGTH]> {
    lift2(a, b, Balance::div)
}

/// [`Balance::percentage`] over raw buffers
pub fn percentage_bytes(value: &[u8], p: &[u8]) -> Option<[u8; BALANCE_BYTE_LENGTH]> {
    lift2(value, p, Balance::percentage)
}
