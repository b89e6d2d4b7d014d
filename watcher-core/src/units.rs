//! Exact piconero / XMR conversion.
//!
//! Monero amounts travel over RPC as integer piconero. One XMR is 10^12
//! piconero, so display formatting needs exactly 12 fractional digits and
//! no binary floating point anywhere. Amounts are kept in a `u128`-backed
//! newtype; every conversion below is pure integer arithmetic and exact
//! for any magnitude the ledger can produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fractional digits in the XMR display unit.
pub const DECIMALS: u32 = 12;

/// Piconero per XMR (10^12).
pub const PICONERO_PER_XMR: u128 = 1_000_000_000_000;

/// Conversion errors. Always a caller bug, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    /// Malformed numeric input.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// An amount in the base unit (piconero).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Piconero(pub u128);

impl Piconero {
    /// Zero piconero.
    pub const ZERO: Piconero = Piconero(0);

    /// Parse an integer piconero string.
    pub fn from_piconero_str(s: &str) -> Result<Self, UnitsError> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UnitsError::InvalidAmount(s.to_string()));
        }
        s.parse::<u128>()
            .map(Piconero)
            .map_err(|_| UnitsError::InvalidAmount(s.to_string()))
    }

    /// Parse an XMR decimal string into piconero.
    ///
    /// Fractional digits beyond 12 are truncated toward zero, never
    /// rounded up: overestimating a transfer amount must not happen
    /// silently. Negative or malformed input is rejected.
    pub fn from_xmr(s: &str) -> Result<Self, UnitsError> {
        let s = s.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(UnitsError::InvalidAmount(s.to_string()));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(UnitsError::InvalidAmount(s.to_string()));
        }

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| UnitsError::InvalidAmount(s.to_string()))?
        };

        // Truncate excess precision, right-pad to 12 digits.
        let frac_digits = &frac_part[..frac_part.len().min(DECIMALS as usize)];
        let mut frac: u128 = 0;
        for b in frac_digits.bytes() {
            frac = frac * 10 + u128::from(b - b'0');
        }
        for _ in frac_digits.len()..DECIMALS as usize {
            frac *= 10;
        }

        whole
            .checked_mul(PICONERO_PER_XMR)
            .and_then(|base| base.checked_add(frac))
            .map(Piconero)
            .ok_or_else(|| UnitsError::InvalidAmount(s.to_string()))
    }

    /// Format as an XMR decimal string with exactly 12 fractional digits.
    pub fn to_xmr(self) -> String {
        format!(
            "{}.{:012}",
            self.0 / PICONERO_PER_XMR,
            self.0 % PICONERO_PER_XMR
        )
    }

    /// Format as "<xmr> XMR".
    pub fn format_with_symbol(self) -> String {
        format!("{} XMR", self.to_xmr())
    }

    /// Exact addition; `None` on overflow.
    pub fn checked_add(self, other: Piconero) -> Option<Piconero> {
        self.0.checked_add(other.0).map(Piconero)
    }

    /// Exact subtraction; `None` when `other > self`.
    pub fn checked_sub(self, other: Piconero) -> Option<Piconero> {
        self.0.checked_sub(other.0).map(Piconero)
    }

    /// Absolute difference, exact for any pair of amounts.
    pub fn abs_diff(self, other: Piconero) -> Piconero {
        Piconero(self.0.abs_diff(other.0))
    }

    /// True when the amount is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Piconero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed XMR display string for the delta `current - previous`.
pub fn signed_xmr(current: Piconero, previous: Piconero) -> String {
    if current >= previous {
        current.abs_diff(previous).to_xmr()
    } else {
        format!("-{}", previous.abs_diff(current).to_xmr())
    }
}

/// True when `s` is a well-formed non-negative integer piconero amount.
pub fn is_valid_piconero(s: &str) -> bool {
    Piconero::from_piconero_str(s).is_ok()
}

/// True when `s` is a well-formed non-negative XMR decimal with at most
/// 12 fractional digits.
pub fn is_valid_xmr(s: &str) -> bool {
    let s = s.trim();
    if Piconero::from_xmr(s).is_err() {
        return false;
    }
    match s.split_once('.') {
        Some((_, frac)) => frac.len() <= DECIMALS as usize,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piconero_to_xmr() {
        assert_eq!(Piconero(1_000_000_000_000).to_xmr(), "1.000000000000");
        assert_eq!(Piconero(500_000_000_000).to_xmr(), "0.500000000000");
        assert_eq!(Piconero(1).to_xmr(), "0.000000000001");
        assert_eq!(Piconero(0).to_xmr(), "0.000000000000");
    }

    #[test]
    fn test_xmr_to_piconero() {
        assert_eq!(Piconero::from_xmr("1").unwrap(), Piconero(1_000_000_000_000));
        assert_eq!(Piconero::from_xmr("0.5").unwrap(), Piconero(500_000_000_000));
        assert_eq!(Piconero::from_xmr("0.000000000001").unwrap(), Piconero(1));
        assert_eq!(Piconero::from_xmr("0").unwrap(), Piconero(0));
        assert_eq!(Piconero::from_xmr(".5").unwrap(), Piconero(500_000_000_000));
    }

    #[test]
    fn test_full_precision_parse() {
        assert_eq!(
            Piconero::from_xmr("1.123456789012").unwrap(),
            Piconero(1_123_456_789_012)
        );
    }

    #[test]
    fn test_excess_precision_truncates() {
        // 13th fractional digit is dropped, not rounded.
        assert_eq!(
            Piconero::from_xmr("1.1234567890129").unwrap(),
            Piconero(1_123_456_789_012)
        );
        assert_eq!(
            Piconero::from_xmr("0.0000000000019").unwrap(),
            Piconero(1)
        );
    }

    #[test]
    fn test_malformed_input_rejected() {
        assert!(Piconero::from_xmr("").is_err());
        assert!(Piconero::from_xmr("-1").is_err());
        assert!(Piconero::from_xmr("1.2.3").is_err());
        assert!(Piconero::from_xmr("abc").is_err());
        assert!(Piconero::from_xmr("1,5").is_err());
        assert!(Piconero::from_piconero_str("1.5").is_err());
        assert!(Piconero::from_piconero_str("-1").is_err());
    }

    #[test]
    fn test_large_amounts() {
        // Past u64 range, still exact.
        let big = Piconero(u128::from(u64::MAX) + 1);
        assert_eq!(Piconero::from_xmr(&big.to_xmr()).unwrap(), big);
    }

    #[test]
    fn test_signed_xmr() {
        let a = Piconero(1_500_000_000_000);
        let b = Piconero(1_000_000_000_000);
        assert_eq!(signed_xmr(a, b), "0.500000000000");
        assert_eq!(signed_xmr(b, a), "-0.500000000000");
        assert_eq!(signed_xmr(a, a), "0.000000000000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Piconero(1_000_000_000_000);
        let b = Piconero(500_000_000_000);
        assert_eq!(a.checked_add(b), Some(Piconero(1_500_000_000_000)));
        assert_eq!(a.checked_sub(b), Some(Piconero(500_000_000_000)));
        assert_eq!(b.checked_sub(a), None);
        assert!(a > b);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_validators() {
        assert!(is_valid_piconero("1000000000000"));
        assert!(is_valid_piconero("0"));
        assert!(!is_valid_piconero("-1"));
        assert!(!is_valid_piconero("1.5"));

        assert!(is_valid_xmr("1.5"));
        assert!(is_valid_xmr("0"));
        assert!(!is_valid_xmr("-1"));
        assert!(!is_valid_xmr("1.1234567890123"));
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(
            Piconero(1_000_000_000_000).format_with_symbol(),
            "1.000000000000 XMR"
        );
    }
}
