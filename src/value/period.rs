use std::fmt;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::sor::{FieldReader, FieldWriter, SorRecord, SorResult};

#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    #[error("unrecognised period unit {0:?}")]
    UnknownUnit(String),

    #[error("expected \"<count> <unit>\", found {0:?}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
    Unspecified,
}

impl PeriodUnit {
    fn tag(self) -> u64 {
        match self {
            PeriodUnit::Second => 0,
            PeriodUnit::Minute => 1,
            PeriodUnit::Hour => 2,
            PeriodUnit::Day => 3,
            PeriodUnit::Week => 4,
            PeriodUnit::Month => 5,
            PeriodUnit::Year => 6,
            PeriodUnit::Unspecified => 7,
        }
    }

    fn from_tag(tag: u64) -> Option<Self> {
        Some(match tag {
            0 => PeriodUnit::Second,
            1 => PeriodUnit::Minute,
            2 => PeriodUnit::Hour,
            3 => PeriodUnit::Day,
            4 => PeriodUnit::Week,
            5 => PeriodUnit::Month,
            6 => PeriodUnit::Year,
            7 => PeriodUnit::Unspecified,
            _ => return None,
        })
    }

    fn singular(self) -> &'static str {
        match self {
            PeriodUnit::Second => "second",
            PeriodUnit::Minute => "minute",
            PeriodUnit::Hour => "hour",
            PeriodUnit::Day => "day",
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Year => "year",
            PeriodUnit::Unspecified => "unspecified",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            PeriodUnit::Unspecified => "unspecified",
            other => {
                // every other unit pluralizes by appending "s"
                match other {
                    PeriodUnit::Second => "seconds",
                    PeriodUnit::Minute => "minutes",
                    PeriodUnit::Hour => "hours",
                    PeriodUnit::Day => "days",
                    PeriodUnit::Week => "weeks",
                    PeriodUnit::Month => "months",
                    PeriodUnit::Year => "years",
                    PeriodUnit::Unspecified => unreachable!(),
                }
            }
        }
    }

    fn parse(s: &str) -> Result<Self, PeriodError> {
        let lower = s.to_ascii_lowercase();
        for unit in [
            PeriodUnit::Second,
            PeriodUnit::Minute,
            PeriodUnit::Hour,
            PeriodUnit::Day,
            PeriodUnit::Week,
            PeriodUnit::Month,
            PeriodUnit::Year,
            PeriodUnit::Unspecified,
        ] {
            if lower == unit.singular() || lower == unit.plural() {
                return Ok(unit);
            }
        }
        Err(PeriodError::UnknownUnit(s.to_string()))
    }
}

/// A count of time units, e.g. "5 days" or "1 week". `.string()` uses the
/// singular form when `count == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub count: u64,
    pub unit: PeriodUnit,
}

impl Period {
    pub fn new(count: u64, unit: PeriodUnit) -> Self {
        Period { count, unit }
    }

    pub fn string(&self) -> String {
        let unit_str = if self.count == 1 { self.unit.singular() } else { self.unit.plural() };
        format!("{} {}", self.count, unit_str)
    }

    pub fn parse(s: &str) -> Result<Self, PeriodError> {
        let s = s.trim();
        let (count_str, unit_str) = s
            .split_once(' ')
            .ok_or_else(|| PeriodError::Malformed(s.to_string()))?;
        let count: u64 = count_str
            .parse()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        let unit = PeriodUnit::parse(unit_str.trim())?;
        Ok(Period::new(count, unit))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.string())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Period::parse(&s).map_err(D::Error::custom)
    }
}

impl SorRecord for Period {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.count);
        w.field(2, &self.unit.tag());
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        let count: u64 = r.require(1)?;
        let unit_tag: u64 = r.require(2)?;
        let unit = PeriodUnit::from_tag(unit_tag)
            .ok_or(crate::sor::SorError::UnsupportedFieldKind(unit_tag))?;
        Ok(Period::new(count, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_form_singular_and_plural() {
        assert_eq!(Period::new(1, PeriodUnit::Day).string(), "1 day");
        assert_eq!(Period::new(5, PeriodUnit::Day).string(), "5 days");
        assert_eq!(Period::new(1, PeriodUnit::Week).string(), "1 week");
        assert_eq!(Period::new(3, PeriodUnit::Unspecified).string(), "3 unspecified");
    }

    #[test]
    fn parses_singular_and_plural() {
        assert_eq!(Period::parse("5 days").unwrap(), Period::new(5, PeriodUnit::Day));
        assert_eq!(Period::parse("1 day").unwrap(), Period::new(1, PeriodUnit::Day));
        assert_eq!(Period::parse("2 Weeks").unwrap(), Period::new(2, PeriodUnit::Week));
    }

    #[test]
    fn unknown_unit_errors() {
        assert!(matches!(Period::parse("5 fortnights"), Err(PeriodError::UnknownUnit(_))));
    }

    #[test]
    fn json_round_trip() {
        let p = Period::new(5, PeriodUnit::Day);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"5 days\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn binary_round_trip_all_units() {
        for unit in [
            PeriodUnit::Second,
            PeriodUnit::Minute,
            PeriodUnit::Hour,
            PeriodUnit::Day,
            PeriodUnit::Week,
            PeriodUnit::Month,
            PeriodUnit::Year,
            PeriodUnit::Unspecified,
        ] {
            let p = Period::new(7, unit);
            let items = crate::sor::marshal(&p);
            let back: Period = crate::sor::unmarshal(&items).unwrap();
            assert_eq!(back, p);
        }
    }
}
