//! Stable serialization for durations, periods, and fixed-precision decimals.
//! These types are used throughout the body protocols (invoice prices,
//! relationship configuration) and need text, JSON, and binary forms that
//! all round-trip.

mod decimal;
mod period;
mod timestamp;

pub use decimal::{Decimal, DecimalError};
pub use period::{Period, PeriodError, PeriodUnit};
pub use timestamp::Timestamp;
