//! Elapsed-time units used to discretise inspection intervals.

use std::fmt;
use std::str::FromStr;

use crate::error::DatasetError;

/// Length of one elapsed-time step, in days.
///
/// Parsed from a compact string:
///
/// | Text | Meaning |
/// |------|---------|
/// | `"N"` | N days |
/// | `"Nd"` | N days |
/// | `"Nm"` | N months of 30 days |
/// | `"Ny"` | N years of 365 days |
///
/// # Example
///
/// ```
/// use deterior_dataset::TimeUnit;
///
/// let unit: TimeUnit = "2m".parse().unwrap();
/// assert_eq!(unit.days(), 60);
/// assert_eq!(unit.elapsed_units(59), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnit {
    days: u32,
}

impl TimeUnit {
    /// A unit of exactly one day.
    pub const DAY: TimeUnit = TimeUnit { days: 1 };

    /// Creates a unit of `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidTimeUnit`] if `days` is zero.
    pub fn from_days(days: u32) -> Result<Self, DatasetError> {
        if days == 0 {
            return Err(DatasetError::InvalidTimeUnit {
                spec: days.to_string(),
                reason: "unit length must be positive".to_string(),
            });
        }
        Ok(Self { days })
    }

    /// Parses a unit specification such as `"1"`, `"7d"`, `"1m"` or `"2y"`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidTimeUnit`] if the count is missing,
    /// non-numeric or zero, or if the suffix is not one of `d`, `m`, `y`.
    pub fn parse(spec: &str) -> Result<Self, DatasetError> {
        let invalid = |reason: String| DatasetError::InvalidTimeUnit {
            spec: spec.to_string(),
            reason,
        };

        let trimmed = spec.trim();
        let (count, multiplier) = match trimmed.char_indices().last() {
            None => return Err(invalid("specification is empty".to_string())),
            Some((i, c)) if c.is_ascii_alphabetic() => {
                let multiplier = match c.to_ascii_lowercase() {
                    'd' => 1,
                    'm' => 30,
                    'y' => 365,
                    other => return Err(invalid(format!("unknown suffix '{other}'"))),
                };
                (&trimmed[..i], multiplier)
            }
            Some(_) => (trimmed, 1),
        };

        let n: u32 = count
            .parse()
            .map_err(|_| invalid(format!("count {count:?} is not a positive integer")))?;
        if n == 0 {
            return Err(invalid("count must be positive".to_string()));
        }
        let days = n
            .checked_mul(multiplier)
            .ok_or_else(|| invalid("unit length overflows".to_string()))?;
        Ok(Self { days })
    }

    /// Returns the unit length in days.
    pub fn days(self) -> u32 {
        self.days
    }

    /// Converts a day difference into elapsed units, rounding to nearest.
    pub fn elapsed_units(self, days: i64) -> i64 {
        (days as f64 / f64::from(self.days)).round() as i64
    }
}

impl Default for TimeUnit {
    fn default() -> Self {
        Self::DAY
    }
}

impl FromStr for TimeUnit {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_days() {
        assert_eq!(TimeUnit::parse("1").unwrap().days(), 1);
        assert_eq!(TimeUnit::parse("14").unwrap().days(), 14);
        assert_eq!(TimeUnit::parse("7d").unwrap().days(), 7);
    }

    #[test]
    fn parse_months_and_years() {
        assert_eq!(TimeUnit::parse("1m").unwrap().days(), 30);
        assert_eq!(TimeUnit::parse("3m").unwrap().days(), 90);
        assert_eq!(TimeUnit::parse("1y").unwrap().days(), 365);
        assert_eq!(TimeUnit::parse(" 2Y ").unwrap().days(), 730);
    }

    #[test]
    fn parse_rejects_malformed() {
        for spec in ["", "d", "m", "0", "0d", "-1", "1w", "1.5y", "abc", "1 d"] {
            assert!(
                matches!(
                    TimeUnit::parse(spec),
                    Err(DatasetError::InvalidTimeUnit { .. })
                ),
                "spec {spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn elapsed_rounds_to_nearest() {
        let month = TimeUnit::parse("1m").unwrap();
        assert_eq!(month.elapsed_units(14), 0);
        assert_eq!(month.elapsed_units(16), 1);
        assert_eq!(month.elapsed_units(44), 1);
        assert_eq!(month.elapsed_units(46), 2);
        assert_eq!(TimeUnit::DAY.elapsed_units(5), 5);
        assert_eq!(TimeUnit::DAY.elapsed_units(-3), -3);
    }

    #[test]
    fn from_str_and_display() {
        let unit: TimeUnit = "1y".parse().unwrap();
        assert_eq!(unit.to_string(), "365d");
        assert_eq!(TimeUnit::default(), TimeUnit::DAY);
    }

    #[test]
    fn from_days_rejects_zero() {
        assert!(TimeUnit::from_days(0).is_err());
        assert_eq!(TimeUnit::from_days(10).unwrap().days(), 10);
    }
}
