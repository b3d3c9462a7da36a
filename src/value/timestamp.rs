use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sor::{SorResult, SorValue};

/// Seconds since the Unix epoch. A thin newtype over `u64` so callers can't
/// accidentally mix it up with a plain duration or count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_secs(secs: u64) -> Self {
        Timestamp(secs)
    }

    pub fn as_secs(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SorValue for Timestamp {
    fn marshal(&self, out: &mut Vec<crate::script::ScriptItem>) {
        self.0.marshal(out);
    }

    fn unmarshal(items: &[crate::script::ScriptItem]) -> SorResult<(Self, usize)> {
        let (value, consumed) = u64::unmarshal(items)?;
        Ok((Timestamp(value), consumed))
    }
}
