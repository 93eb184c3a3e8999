//! The containment predicate that triggers agency merges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How one agency label is judged to contain another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentRule {
    /// `inner` occurs anywhere in `outer` as a contiguous substring.
    #[default]
    Substring,

    /// `inner` occurs in `outer` and neither neighbouring character is
    /// alphanumeric, so "Bureau" is found in "Bureau of Mines" but not in
    /// "Bureaucracy Office".
    TokenBoundary,
}

impl ContainmentRule {
    /// Whether `outer` contains `inner` under this rule.
    ///
    /// An empty `inner` is contained in everything; the merge engine
    /// excludes empty labels before consulting the rule.
    ///
    /// # Examples
    /// ```
    /// use ecfr_wordcount::ContainmentRule;
    ///
    /// assert!(ContainmentRule::Substring.contains("Bureau of Examples", "Bureau"));
    /// assert!(!ContainmentRule::Substring.contains("Bureau", "Bureau of Examples"));
    /// assert!(!ContainmentRule::TokenBoundary.contains("Bureaucracy Office", "Bureau"));
    /// ```
    #[must_use]
    pub fn contains(self, outer: &str, inner: &str) -> bool {
        match self {
            Self::Substring => outer.contains(inner),
            Self::TokenBoundary => contains_at_token_boundary(outer, inner),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::TokenBoundary => "token",
        }
    }
}

impl fmt::Display for ContainmentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainmentRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "token" | "token_boundary" | "token-boundary" => Ok(Self::TokenBoundary),
            other => Err(format!(
                "unknown containment rule '{other}', expected 'substring' or 'token'"
            )),
        }
    }
}

fn contains_at_token_boundary(outer: &str, inner: &str) -> bool {
    if inner.is_empty() {
        return true;
    }

    // Occurrences may overlap, so every start position is tried
    outer.char_indices().any(|(start, _)| {
        if !outer[start..].starts_with(inner) {
            return false;
        }
        let end = start + inner.len();
        let before_ok = outer[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = outer[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
