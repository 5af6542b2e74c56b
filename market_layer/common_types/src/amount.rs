//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A non-negative quantity of the chain's currency in its smallest (base) unit.
///
/// The wire boundary always carries base units; the human denomination is a
/// fixed-exponent decimal scaling of them. Both conversions are exact integer
/// arithmetic. Parsing rejects inputs with more fractional digits than the
/// exponent allows rather than rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(u128);

impl Amount {
    pub const fn new(base_units: u128) -> Self {
        Self(base_units)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn checked_mul(&self, rhs: u128) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    pub fn checked_div(&self, rhs: u128) -> Option<Self> {
        self.0.checked_div(rhs).map(Self)
    }

    pub fn checked_rem(&self, rhs: u128) -> Option<Self> {
        self.0.checked_rem(rhs).map(Self)
    }

    /// Parses a human-denomination decimal string into base units, where
    /// `decimals` is the base-unit exponent (e.g. 18 for wei).
    pub fn from_decimal_str(s: &str, decimals: u32) -> Result<Self, AmountError> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::InvalidDecimal { given: s.to_string() });
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::InvalidDecimal { given: s.to_string() });
        }
        if frac_part.len() > decimals as usize {
            return Err(AmountError::TooManyDecimalPlaces {
                given: s.to_string(),
                decimals,
            });
        }

        let scale = pow10(decimals).ok_or(AmountError::Overflow)?;
        let int_val = if int_part.is_empty() {
            0u128
        } else {
            int_part.parse::<u128>().map_err(|_| AmountError::Overflow)?
        };
        let frac_val = if frac_part.is_empty() {
            0u128
        } else {
            let parsed = frac_part.parse::<u128>().map_err(|_| AmountError::Overflow)?;
            let rescale = pow10(decimals - frac_part.len() as u32).ok_or(AmountError::Overflow)?;
            parsed.checked_mul(rescale).ok_or(AmountError::Overflow)?
        };

        int_val
            .checked_mul(scale)
            .and_then(|v| v.checked_add(frac_val))
            .map(Self)
            .ok_or(AmountError::Overflow)
    }

    /// Formats the amount in the human denomination, trimming trailing
    /// fractional zeros. The inverse of [`Self::from_decimal_str`].
    pub fn to_decimal_string(&self, decimals: u32) -> String {
        let scale = match pow10(decimals) {
            Some(s) => s,
            None => return self.0.to_string(),
        };
        let int_part = self.0 / scale;
        let frac_part = self.0 % scale;
        if frac_part == 0 {
            return int_part.to_string();
        }
        let frac = format!("{:0width$}", frac_part, width = decimals as usize);
        format!("{}.{}", int_part, frac.trim_end_matches('0'))
    }
}

fn pow10(exp: u32) -> Option<u128> {
    10u128.checked_pow(exp)
}

impl From<u128> for Amount {
    fn from(base_units: u128) -> Self {
        Self(base_units)
    }
}

impl From<u64> for Amount {
    fn from(base_units: u64) -> Self {
        Self(u128::from(base_units))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// u128 does not survive JSON number round trips, so amounts serialize as
// base-unit strings.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse::<u128>().map(Self).map_err(de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid decimal amount: {given}")]
    InvalidDecimal { given: String },
    #[error("Amount {given} has more than {decimals} decimal places")]
    TooManyDecimalPlaces { given: String, decimals: u32 },
    #[error("Amount overflows the base-unit range")]
    Overflow,
}
