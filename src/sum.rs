use serde_with::{DeserializeFromStr, SerializeDisplay};

use std::{
    fmt::{Debug, Display},
    ops::Add,
    str::FromStr,
};

/// Represents a running sales total.
///
/// Totals are whole numbers and may hold at most ten decimal digits; see
/// [`Sum::LIMIT`]. Addition saturates rather than wrapping, so a total that
/// has run past `u64::MAX` still compares as over the limit.
#[derive(
    Clone, Copy, Default, DeserializeFromStr, SerializeDisplay, Eq, PartialEq, Ord, PartialOrd,
)]
pub struct Sum(u64);

impl Sum {
    /// The smallest total that no longer fits in ten digits.
    pub const LIMIT: Sum = Sum(10_000_000_000);

    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Reports whether this total has reached [`Sum::LIMIT`].
    #[must_use]
    pub fn exceeds_limit(self) -> bool {
        self >= Self::LIMIT
    }
}

impl Debug for Sum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Sum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a plain run of ASCII digits. Signs, spaces and separators are
/// rejected, as is the empty string.
impl FromStr for Sum {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            anyhow::bail!("not a whole number: {s:?}");
        }
        Ok(Self(s.parse()?))
    }
}

impl Add for Sum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}
