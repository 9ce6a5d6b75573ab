use std::borrow::Borrow;
use std::fmt;

/// Identifier of a style-bearing target (for example a DOM-like element id).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl TargetId {
    /// Create a target id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TargetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Half-open millisecond window `[start, end)` on a playback timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsRange {
    /// Inclusive start offset.
    pub start: u64,
    /// Exclusive end offset.
    pub end: u64,
}

impl MsRange {
    /// Window starting at `start` and lasting `duration` milliseconds.
    pub fn at(start: u64, duration: u64) -> Self {
        Self {
            start,
            end: start.saturating_add(duration),
        }
    }

    /// Length of the window in milliseconds.
    pub fn len_ms(self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Return `true` when the window covers no time.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: u64) -> bool {
        self.start <= t && t < self.end
    }

    /// Return `true` when both windows share at least one millisecond.
    ///
    /// Empty windows never overlap anything.
    pub fn overlaps(self, other: Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// Shift both bounds forward by `delta` milliseconds.
    pub fn shift(self, delta: u64) -> Self {
        Self {
            start: self.start.saturating_add(delta),
            end: self.end.saturating_add(delta),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
