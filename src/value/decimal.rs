use std::fmt;
use std::io::{self, Read, Write};

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::script::{read_var_int, write_var_int};
use crate::sor::{SorResult, SorValue};

#[derive(Debug, thiserror::Error)]
pub enum DecimalError {
    #[error("decimal string contains more than one '.'")]
    MultipleDecimalPoints,

    #[error("decimal string contains a non-digit character")]
    NonDigit,

    #[error("decimal value overflowed u64")]
    Overflow,
}

/// A fixed-precision decimal: `value` scaled by `10^-precision`.
///
/// **Equality is literal**: `Decimal { value: 10, precision: 1 }` (`"1.0"`)
/// is NOT equal to `Decimal { value: 100, precision: 2 }` (`"1.00"`) under
/// `==`, even though they denote the same number. This is a deliberate
/// choice among two valid readings of an ambiguous upstream behaviour — see
/// `Decimal::normalized_eq` for the other interpretation and DESIGN.md for
/// the rationale.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Decimal {
    pub value: u64,
    pub precision: u8,
}

impl Decimal {
    pub fn new(value: u64, precision: u8) -> Self {
        Decimal { value, precision }
    }

    /// Numeric equality: compares `value / 10^precision` rather than the raw
    /// fields, so `1.0 == 1.00` under this relation. Not what `==` does.
    pub fn normalized_eq(&self, other: &Decimal) -> bool {
        let (a, b) = (self.precision, other.precision);
        let (va, vb) = if a >= b {
            (self.value, other.value.saturating_mul(10u64.pow((a - b) as u32)))
        } else {
            (self.value.saturating_mul(10u64.pow((b - a) as u32)), other.value)
        };
        va == vb
    }

    pub fn to_text(&self) -> String {
        if self.precision == 0 {
            return self.value.to_string();
        }
        let scale = 10u64.pow(self.precision as u32);
        let whole = self.value / scale;
        let frac = self.value % scale;
        format!("{whole}.{frac:0width$}", width = self.precision as usize)
    }

    pub fn parse(s: &str) -> Result<Self, DecimalError> {
        if s.matches('.').count() > 1 {
            return Err(DecimalError::MultipleDecimalPoints);
        }
        if !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(DecimalError::NonDigit);
        }
        match s.split_once('.') {
            None => {
                let value: u64 = s.parse().map_err(|_| DecimalError::Overflow)?;
                Ok(Decimal::new(value, 0))
            }
            Some((whole, frac)) => {
                let precision = frac.len() as u8;
                let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| DecimalError::Overflow)? };
                let frac_value: u64 = if frac.is_empty() { 0 } else { frac.parse().map_err(|_| DecimalError::Overflow)? };
                let scale = 10u64
                    .checked_pow(precision as u32)
                    .ok_or(DecimalError::Overflow)?;
                let value = whole
                    .checked_mul(scale)
                    .and_then(|v| v.checked_add(frac_value))
                    .ok_or(DecimalError::Overflow)?;
                Ok(Decimal::new(value, precision))
            }
        }
    }

    pub fn write_binary<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_var_int(w, self.value)?;
        write_var_int(w, self.precision as u64)
    }

    pub fn read_binary<R: Read>(r: &mut R) -> SorResult<Self> {
        let value = read_var_int(r)?;
        let precision = read_var_int(r)? as u8;
        Ok(Decimal::new(value, precision))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Decimal::parse(&s).map_err(D::Error::custom)
    }
}

impl SorValue for Decimal {
    fn marshal(&self, out: &mut Vec<crate::script::ScriptItem>) {
        self.value.marshal(out);
        (self.precision as u64).marshal(out);
    }

    fn unmarshal(items: &[crate::script::ScriptItem]) -> SorResult<(Self, usize)> {
        let (value, consumed_value) = u64::unmarshal(items)?;
        let (precision, consumed_precision) = u64::unmarshal(&items[consumed_value..])?;
        Ok((Decimal::new(value, precision as u8), consumed_value + consumed_precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trip() {
        for (value, precision, text) in [(1234u64, 2u8, "12.34"), (5, 0, "5"), (100, 3, "0.100")] {
            let d = Decimal::new(value, precision);
            assert_eq!(d.to_text(), text);
            assert_eq!(Decimal::parse(text).unwrap(), d);
        }
    }

    #[test]
    fn rejects_multiple_dots() {
        assert!(matches!(Decimal::parse("1.2.3"), Err(DecimalError::MultipleDecimalPoints)));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(matches!(Decimal::parse("1.2a"), Err(DecimalError::NonDigit)));
    }

    #[test]
    fn literal_equality_distinguishes_precision() {
        let a = Decimal::new(10, 1); // "1.0"
        let b = Decimal::new(100, 2); // "1.00"
        assert_ne!(a, b);
        assert!(a.normalized_eq(&b));
    }

    #[test]
    fn json_round_trip_is_quoted() {
        let d = Decimal::new(1234, 2);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"12.34\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn binary_round_trip() {
        let d = Decimal::new(540_000, 0);
        let mut buf = Vec::new();
        d.write_binary(&mut buf).unwrap();
        let mut cursor = buf.as_slice();
        assert_eq!(Decimal::read_binary(&mut cursor).unwrap(), d);
    }
}
