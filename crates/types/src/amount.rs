//! Fixed-point amounts with eight decimal places.
//!
//! Amounts are stored as a signed count of 1e-8 units and rendered as a
//! decimal string with exactly eight fraction digits.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fraction digits
pub const DECIMALS: usize = 8;

/// Units per whole coin (10^8)
pub const UNITS_PER_COIN: i64 = 100_000_000;

/// Errors from parsing a decimal amount string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Not a decimal number
    #[error("invalid amount: {0:?}")]
    Invalid(String),

    /// More than eight fraction digits
    #[error("too many fraction digits: {digits} (max 8)")]
    TooPrecise {
        /// Number of fraction digits given
        digits: usize,
    },

    /// Value does not fit in 64 bits of 1e-8 units
    #[error("amount out of range")]
    Overflow,
}

/// Amount in 1e-8 units.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed8(pub i64);

impl Fixed8 {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Create from raw units
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Raw units
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Debug for Fixed8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed8({})", self)
    }
}

impl fmt::Display for Fixed8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_coin = UNITS_PER_COIN as u64;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / per_coin,
            abs % per_coin,
            width = DECIMALS
        )
    }
}

impl FromStr for Fixed8 {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountError::Invalid(s.to_string());

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }
        if frac_part.len() > DECIMALS {
            return Err(AmountError::TooPrecise {
                digits: frac_part.len(),
            });
        }

        // Integer digits followed by the fraction padded to eight places
        let mut units: i128 = 0;
        let padding = DECIMALS - frac_part.len();
        let digits = int_part
            .bytes()
            .chain(frac_part.bytes())
            .chain(std::iter::repeat(b'0').take(padding));
        for digit in digits {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(i128::from(digit - b'0')))
                .filter(|u| *u <= i128::from(i64::MAX) + 1)
                .ok_or(AmountError::Overflow)?;
        }

        let units = if negative { -units } else { units };
        i64::try_from(units).map(Self).map_err(|_| AmountError::Overflow)
    }
}

impl From<i64> for Fixed8 {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl From<Fixed8> for i64 {
    fn from(amount: Fixed8) -> Self {
        amount.0
    }
}

impl Serialize for Fixed8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_i64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Fixed8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            i64::deserialize(deserializer).map(Self)
        }
    }
}
