//! Time source for completion records.

use chrono::{DateTime, SubsecRound, Utc};

/// Where completion timestamps come from.
///
/// Readings are truncated to whole milliseconds, the precision the course
/// API stores, so a record read back compares equal to the one sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    /// Always reads the same instant. Used by tests and demos.
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at.trunc_subsecs(3))
    }

    /// Timestamp to put on a completion record.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now().trunc_subsecs(3),
            Clock::Fixed(t) => *t,
        }
    }
}

/// 2025-06-17T12:00:00Z.
pub const FIXED_TEST_TIMESTAMP: i64 = 1_750_161_600;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
