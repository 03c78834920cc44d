//! Stage outcomes
//!
//! Every pipeline stage either produces a value or deliberately skips its
//! work. Skips are part of the contract, so they are returned as values
//! instead of being hidden behind early returns.

use serde::Serialize;

/// Why a stage passed its input through without doing any work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The file already fits the byte budget
    WithinBudget { size_bytes: u64, target_bytes: u64 },
    /// The document has no extractable text layer (e.g. scanned images)
    NoTextLayer,
    /// There was no text to summarize
    EmptyInput,
}

/// Result of a stage that may legitimately do nothing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Skipped(SkipReason),
    Produced(T),
}

impl<T> Outcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    /// The produced value, if any
    pub fn produced(&self) -> Option<&T> {
        match self {
            Outcome::Produced(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Outcome::Skipped(reason) => Some(*reason),
            Outcome::Produced(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Produced(value) => Outcome::Produced(f(value)),
            Outcome::Skipped(reason) => Outcome::Skipped(reason),
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Collapse a skip into the type's empty value
    pub fn unwrap_or_default(self) -> T {
        match self {
            Outcome::Produced(value) => value,
            Outcome::Skipped(_) => T::default(),
        }
    }
}
