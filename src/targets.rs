use std::fmt;

use serde::{Deserialize, Serialize};

/// The sites every run fetches unless told otherwise.
pub const TARGETS: [&str; 7] = [
    "https://www.microsoft.com",
    "https://www.cnn.com",
    "https://www.yahoo.com",
    "https://www.amazon.com",
    "https://www.ebay.com",
    "https://www.stackoverflow.com",
    "https://www.codeproject.com",
];

/// One resource to fetch. Not validated: a malformed URL shows up as a
/// fetch failure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new<S: Into<String>>(target: S) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Target {
    fn from(target: &str) -> Self {
        Self::new(target)
    }
}

impl From<String> for Target {
    fn from(target: String) -> Self {
        Self(target)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn list_targets() -> Vec<Target> {
    TARGETS.iter().copied().map(Target::from).collect()
}

/// Split a comma-separated list, as given on the command line.
pub fn parse_targets(list: &str) -> Vec<Target> {
    list.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(Target::from)
        .collect()
}
