//! Ballot threshold: an exact fraction in `[0, 1]` stored in basis points.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Basis points in a whole (10 000 bps = 1.00).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Minimum fraction of the frozen voter roster that must agree to finalize a ballot.
///
/// Comparisons are done by integer cross-multiplication so every replica
/// reaches the same answer bit-for-bit.
///
/// Serialized as a decimal string (`"0.6600"`); deserializing goes through
/// [`FromStr`], so values above 1.00 are rejected at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Threshold(u32);

impl Threshold {
    /// Unanimity (1.00), used by keygen ballots.
    pub const UNANIMOUS: Self = Self(BPS_DENOMINATOR);

    /// Default ballot threshold for external chains (0.66).
    pub const DEFAULT: Self = Self(6_600);

    /// Build a threshold from basis points. Fails above 10 000.
    pub fn from_bps(bps: u32) -> Result<Self, TypesError> {
        if bps > BPS_DENOMINATOR {
            return Err(TypesError::InvalidThreshold(format!(
                "{bps} bps exceeds {BPS_DENOMINATOR}"
            )));
        }
        Ok(Self(bps))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    /// Whether `count / total >= self`. A zero total never meets a threshold.
    pub fn is_met(&self, count: usize, total: usize) -> bool {
        if total == 0 || count == 0 {
            return false;
        }
        (count as u128) * u128::from(BPS_DENOMINATOR) >= u128::from(self.0) * (total as u128)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parses decimal strings such as `"0.66"`, `"1"` or `"1.00"` (at most 4 fractional digits).
impl FromStr for Threshold {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidThreshold(s.to_string());
        let (whole, frac) = match s.trim().split_once('.') {
            Some((w, f)) => (w, f),
            None => (s.trim(), ""),
        };
        if whole.is_empty() || frac.len() > 4 {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u32 = whole.parse().map_err(|_| invalid())?;
        let mut frac_bps = 0u32;
        for (i, digit) in frac.bytes().enumerate() {
            frac_bps += u32::from(digit - b'0') * 10u32.pow(3 - i as u32);
        }
        let bps = whole
            .checked_mul(BPS_DENOMINATOR)
            .and_then(|w| w.checked_add(frac_bps))
            .ok_or_else(invalid)?;
        Self::from_bps(bps)
    }
}

impl TryFrom<String> for Threshold {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Threshold> for String {
    fn from(t: Threshold) -> Self {
        t.to_string()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:04}", self.0 / BPS_DENOMINATOR, self.0 % BPS_DENOMINATOR)
    }
}
