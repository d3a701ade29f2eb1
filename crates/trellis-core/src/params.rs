//! Path parameters captured by an engine match.
//!
//! Engines insert a [`Params`] value into the request extensions before the
//! handler chain runs; handlers read it back with [`Params::of`].

use crate::handler::Request;
use smallvec::SmallVec;
use std::str::FromStr;

/// Captures kept on the stack before spilling to the heap.
const INLINE_CAPTURES: usize = 4;

/// Captured `(name, value)` pairs in path order.
///
/// ```
/// use trellis_core::Params;
///
/// let mut params = Params::new();
/// params.push("id", "42");
/// params.push("subId", "7");
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.parse::<u32>("subId"), Some(7));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    captures: SmallVec<[(String, String); INLINE_CAPTURES]>,
}

impl Params {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a capture.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.captures.push((name.into(), value.into()));
    }

    /// Value of the first capture with this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses a capture, `None` when missing or malformed.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    /// Number of captures.
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Drops captures past `len`. Used to unwind a failed match branch.
    pub fn truncate(&mut self, len: usize) {
        self.captures.truncate(len);
    }

    /// Iterates captures in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.captures.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Params stored on a request, empty if the engine stored none.
    pub fn of(request: &Request) -> Self {
        request.extensions().get::<Self>().cloned().unwrap_or_default()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            captures: iter.into_iter().collect(),
        }
    }
}
