// Resource identifiers
// The API hands out integer primary keys, but nothing here relies on that

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a task, group or user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Numeric text becomes `Number` so ids typed on the command line compare
/// equal to the ones the API sends back
impl FromStr for ResourceId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(s.to_string())))
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
