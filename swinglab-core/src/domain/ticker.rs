//! Ticker identity as known to the bar store.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerId(pub u32);

impl fmt::Display for TickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub id: TickerId,
    pub symbol: String,
}

impl Ticker {
    pub fn new(id: u32, symbol: impl Into<String>) -> Self {
        Self {
            id: TickerId(id),
            symbol: symbol.into(),
        }
    }
}
