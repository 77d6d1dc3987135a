use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Non-float money amount represented as **integer cents**.
///
/// Every balance and every income/expense amount in the engine goes through
/// this type, so repeated credit/debit never accumulates rounding drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Addition that reports overflow as `InvalidAmount`.
    pub fn try_add(self, rhs: MoneyCents) -> ResultEngine<MoneyCents> {
        self.0
            .checked_add(rhs.0)
            .map(MoneyCents)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
    }

    /// Subtraction that reports overflow as `InvalidAmount`.
    pub fn try_sub(self, rhs: MoneyCents) -> ResultEngine<MoneyCents> {
        self.0
            .checked_sub(rhs.0)
            .map(MoneyCents)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
    }

    /// Rejects zero and negative amounts.
    pub fn ensure_positive(self, label: &str) -> ResultEngine<MoneyCents> {
        if !self.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "{label} amount must be > 0"
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn try_add_reports_overflow() {
        let err = MoneyCents::new(i64::MAX)
            .try_add(MoneyCents::new(1))
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidAmount("amount too large".to_string()));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(MoneyCents::new(0).ensure_positive("income").is_err());
        assert!(MoneyCents::new(-5).ensure_positive("income").is_err());
        assert_eq!(
            MoneyCents::new(5).ensure_positive("income").unwrap(),
            MoneyCents::new(5)
        );
    }
}
