//! Normalized temperature dataset.
//!
//! The source document carries a base temperature and a list of monthly
//! variances from it. Absolute temperatures are derived on demand and never
//! stored.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Calendar month, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Month from its 1-based calendar number.
    #[must_use]
    pub fn from_number(number: i64) -> Option<Self> {
        usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// 0-based position in [`Month::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// English month name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One monthly observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRecord {
    /// Calendar year.
    pub year: i32,
    /// Month of the observation.
    pub month: Month,
    /// Deviation from the dataset base temperature, in °C.
    pub variance: f64,
}

impl TemperatureRecord {
    /// Create a record.
    #[must_use]
    pub const fn new(year: i32, month: Month, variance: f64) -> Self {
        Self { year, month, variance }
    }

    /// Absolute temperature given the dataset base temperature.
    #[must_use]
    pub fn temperature(&self, base_temperature: f64) -> f64 {
        base_temperature + self.variance
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    base_temperature: f64,
    monthly_variance: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    year: i32,
    month: i64,
    variance: f64,
}

/// Base temperature plus the ordered monthly records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    base_temperature: f64,
    records: Vec<TemperatureRecord>,
}

impl Dataset {
    /// Create a dataset from already-validated parts.
    #[must_use]
    pub fn new(base_temperature: f64, records: Vec<TemperatureRecord>) -> Self {
        Self {
            base_temperature,
            records,
        }
    }

    /// Parse and normalize a JSON document.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] if `json` is not JSON, otherwise as [`Dataset::from_value`].
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(Error::Parse)?;
        Self::from_value(value)
    }

    /// Normalize an already parsed JSON document.
    ///
    /// # Errors
    ///
    /// [`Error::Schema`] if `baseTemperature` or `monthlyVariance` is missing or
    /// mistyped, or if any month lies outside 1-12.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawDataset =
            serde_json::from_value(value).map_err(|e| Error::Schema(e.to_string()))?;

        let records = raw
            .monthly_variance
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let month = Month::from_number(r.month).ok_or_else(|| {
                    Error::Schema(format!("record {i}: month {} is outside 1-12", r.month))
                })?;
                Ok(TemperatureRecord::new(r.year, month, r.variance))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(raw.base_temperature, records))
    }

    /// Reference temperature the variances are measured against.
    #[must_use]
    pub const fn base_temperature(&self) -> f64 {
        self.base_temperature
    }

    /// Records in source order.
    #[must_use]
    pub fn records(&self) -> &[TemperatureRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Absolute temperature of a record.
    #[must_use]
    pub fn temperature(&self, record: &TemperatureRecord) -> f64 {
        record.temperature(self.base_temperature)
    }

    /// First and last year, or `None` when empty.
    #[must_use]
    pub fn year_extent(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Coldest and warmest absolute temperature, or `None` when empty.
    #[must_use]
    pub fn temperature_extent(&self) -> Option<(f64, f64)> {
        let mut temps = self.records.iter().map(|r| self.temperature(r));
        let first = temps.next()?;
        Some(temps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// Number of distinct years present.
    #[must_use]
    pub fn distinct_years(&self) -> usize {
        self.records.iter().map(|r| r.year).collect::<BTreeSet<_>>().len()
    }

    /// `"<minYear> - <maxYear>: base temperature <base>°C"`, or `None` when empty.
    #[must_use]
    pub fn subtitle(&self) -> Option<String> {
        let (min, max) = self.year_extent()?;
        Some(format!(
            "{min} - {max}: base temperature {}°C",
            self.base_temperature
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = r#"{
        "baseTemperature": 8.66,
        "monthlyVariance": [
            {"year": 1753, "month": 1, "variance": -1.366},
            {"year": 1753, "month": 2, "variance": -2.223},
            {"year": 1754, "month": 12, "variance": 0.5}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        assert_relative_eq!(dataset.base_temperature(), 8.66);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[2], TemperatureRecord::new(1754, Month::December, 0.5));
    }

    #[test]
    fn test_temperature_is_base_plus_variance() {
        let dataset = Dataset::new(8.0, vec![TemperatureRecord::new(2000, Month::January, -0.3)]);
        assert_relative_eq!(dataset.temperature(&dataset.records()[0]), 7.7);
    }

    #[test]
    fn test_extents() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.year_extent(), Some((1753, 1754)));
        let (lo, hi) = dataset.temperature_extent().unwrap();
        assert_relative_eq!(lo, 8.66 - 2.223);
        assert_relative_eq!(hi, 9.16);
        assert_eq!(dataset.distinct_years(), 2);
    }

    #[test]
    fn test_subtitle() {
        let dataset = Dataset::new(8.0, vec![TemperatureRecord::new(2000, Month::January, -0.3)]);
        assert_eq!(dataset.subtitle().unwrap(), "2000 - 2000: base temperature 8°C");

        let dataset = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.subtitle().unwrap(), "1753 - 1754: base temperature 8.66°C");
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::from_json(r#"{"baseTemperature": 8.66, "monthlyVariance": []}"#).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.year_extent(), None);
        assert_eq!(dataset.temperature_extent(), None);
        assert_eq!(dataset.subtitle(), None);
    }

    #[test]
    fn test_missing_monthly_variance() {
        let err = Dataset::from_json(r#"{"baseTemperature": 8.66}"#).unwrap_err();
        match err {
            Error::Schema(msg) => assert!(msg.contains("monthlyVariance")),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_types() {
        let err = Dataset::from_json(r#"{"baseTemperature": "warm", "monthlyVariance": []}"#).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));

        let err = Dataset::from_json(
            r#"{"baseTemperature": 8, "monthlyVariance": [{"year": 1753, "month": 1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        let err = Dataset::from_json(
            r#"{"baseTemperature": 8, "monthlyVariance": [
                {"year": 1753, "month": 1, "variance": 0.1},
                {"year": 1753, "month": 13, "variance": 0.1}
            ]}"#,
        )
        .unwrap_err();
        match err {
            Error::Schema(msg) => {
                assert!(msg.contains("record 1"));
                assert!(msg.contains("13"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }

        let zero = r#"{"baseTemperature": 8, "monthlyVariance": [{"year": 1753, "month": 0, "variance": 0.1}]}"#;
        assert!(matches!(Dataset::from_json(zero), Err(Error::Schema(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Dataset::from_json(r#"{"baseTemperature": 8.66,"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_integer_base_temperature_accepted() {
        let dataset = Dataset::from_json(r#"{"baseTemperature": 8, "monthlyVariance": []}"#).unwrap();
        assert_relative_eq!(dataset.base_temperature(), 8.0);
    }

    #[test]
    fn test_month_numbering() {
        assert_eq!(Month::from_number(1), Some(Month::January));
        assert_eq!(Month::from_number(12), Some(Month::December));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(-3), None);
        assert_eq!(Month::from_number(13), None);
        assert_eq!(Month::March.index(), 2);
        assert_eq!(Month::September.to_string(), "September");
    }
}
