//! Historical records and their resampling onto a regular time grid

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// One dated sales figure as supplied by the caller.
///
/// The date stays raw until the series is prepared, so a missing or
/// malformed date surfaces as a [`ForecastError::DataError`] there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    #[serde(default, alias = "fecha")]
    pub date: Option<String>,
    #[serde(alias = "ventas")]
    pub value: f64,
}

impl HistoricalPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: Some(date.into()),
            value,
        }
    }
}

/// Resampling granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Label of the period containing `date`: the day itself, the Monday
    /// opening its week, or the last day of its month.
    pub fn period_of(&self, date: NaiveDate) -> Result<NaiveDate> {
        let label = match self {
            Frequency::Daily => Some(date),
            Frequency::Weekly => {
                date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
            }
            Frequency::Monthly => month_end(date),
        };
        label.ok_or_else(|| out_of_range(date))
    }

    /// Label of the period following `label`
    pub fn next_period(&self, label: NaiveDate) -> Result<NaiveDate> {
        let next = match self {
            Frequency::Daily => label.checked_add_days(Days::new(1)),
            Frequency::Weekly => label.checked_add_days(Days::new(7)),
            Frequency::Monthly => label.checked_add_days(Days::new(1)).and_then(month_end),
        };
        next.ok_or_else(|| out_of_range(label))
    }

    /// Number of periods from label `first` through label `last`, inclusive
    pub fn periods_between(&self, first: NaiveDate, last: NaiveDate) -> usize {
        if last < first {
            return 0;
        }
        let span = match self {
            Frequency::Daily => last.signed_duration_since(first).num_days(),
            Frequency::Weekly => last.signed_duration_since(first).num_days() / 7,
            Frequency::Monthly => {
                let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
                months(last) - months(first)
            }
        };
        span as usize + 1
    }

    /// Date of the `periods`-th forecast step after `last`, if it stays
    /// within four-digit years
    pub fn horizon_end(&self, last: NaiveDate, periods: usize) -> Option<NaiveDate> {
        let days = self.step_days().checked_mul(u64::try_from(periods).ok()?)?;
        last.checked_add_days(Days::new(days))
            .filter(|end| end.year() <= MAX_YEAR)
    }

    /// Days between forecast dates; months are approximated as 30 days
    pub fn step_days(&self) -> u64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => 30,
        }
    }

    /// Natural seasonal cycle length for this granularity
    pub fn seasonal_period(&self) -> usize {
        match self {
            Frequency::Daily => 7,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
        }
    }

    /// Single-letter resampling code
    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Daily => "D",
            Frequency::Weekly => "W",
            Frequency::Monthly => "M",
        }
    }
}

impl FromStr for Frequency {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "d" | "daily" | "diario" => Ok(Frequency::Daily),
            "w" | "weekly" | "semanal" => Ok(Frequency::Weekly),
            "m" | "monthly" | "mensual" => Ok(Frequency::Monthly),
            _ => Err(ForecastError::ValidationError(format!(
                "Unsupported frequency: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Latest calendar year accepted in input or forecast dates
pub const MAX_YEAR: i32 = 9999;

fn out_of_range(date: NaiveDate) -> ForecastError {
    ForecastError::DataError(format!("Date {} is out of the supported range", date))
}

/// Parse a calendar date from `YYYY-MM-DD`, a naive timestamp or RFC 3339
///
/// Only years 1 through [`MAX_YEAR`] are accepted.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let date = parse_calendar_date(raw.trim())?;
    if !(1..=MAX_YEAR).contains(&date.year()) {
        return Err(ForecastError::DataError(format!(
            "Date '{}' is outside years 1 to {}",
            raw.trim(),
            MAX_YEAR
        )));
    }
    Ok(date)
}

fn parse_calendar_date(raw: &str) -> Result<NaiveDate> {

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.date());
        }
    }

    Err(ForecastError::DataError(format!(
        "Unparsable date: '{}'",
        raw
    )))
}

/// Regularly spaced series produced from historical records
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesData {
    frequency: Frequency,
    periods: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeriesData {
    /// Create a series from already aligned period labels and values
    pub fn new(frequency: Frequency, periods: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if periods.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Periods length ({}) doesn't match values length ({})",
                periods.len(),
                values.len()
            )));
        }
        if periods.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ForecastError::DataError(
                "Periods must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            frequency,
            periods,
            values,
        })
    }

    /// Resample raw records onto the `frequency` grid.
    ///
    /// Records sharing a period are summed and periods with no records
    /// between the first and last observation are filled with zero.
    pub fn from_points(points: &[HistoricalPoint], frequency: Frequency) -> Result<Self> {
        Self::from_points_limited(points, frequency, usize::MAX)
    }

    /// Like [`TimeSeriesData::from_points`], but rejects records spanning
    /// more than `max_periods` periods before any filling happens
    pub fn from_points_limited(
        points: &[HistoricalPoint],
        frequency: Frequency,
        max_periods: usize,
    ) -> Result<Self> {
        let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for (index, point) in points.iter().enumerate() {
            let raw = point.date.as_deref().ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Historical record {} is missing its date",
                    index
                ))
            })?;
            let label = frequency.period_of(parse_date(raw)?)?;
            *buckets.entry(label).or_insert(0.0) += point.value;
        }

        let (first, last) = match (buckets.keys().next(), buckets.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Self::new(frequency, Vec::new(), Vec::new()),
        };

        let span = frequency.periods_between(first, last);
        if span > max_periods {
            return Err(ForecastError::ValidationError(format!(
                "Historical data spans {} {} periods, the limit is {}",
                span, frequency, max_periods
            )));
        }

        let mut periods = Vec::with_capacity(span);
        let mut values = Vec::with_capacity(span);
        let mut current = first;
        while current <= last {
            periods.push(current);
            values.push(buckets.get(&current).copied().unwrap_or(0.0));
            current = frequency.next_period(current)?;
        }

        debug!(
            records = points.len(),
            periods = periods.len(),
            frequency = %frequency,
            "Resampled historical records"
        );

        Self::new(frequency, periods, values)
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Period labels in increasing order
    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    /// Aggregated values, one per period
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Label of the most recent period
    pub fn last_period(&self) -> Option<NaiveDate> {
        self.periods.last().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean of the values, `0.0` when empty
    pub fn mean(&self) -> f64 {
        forecast_math::mean(&self.values)
    }
}

/// Loader for historical records stored outside the request
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load records from a CSV file with a `date,value` (or `fecha,ventas`) header
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<HistoricalPoint>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load records from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<HistoricalPoint>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let points = reader
            .deserialize()
            .collect::<std::result::Result<Vec<HistoricalPoint>, csv::Error>>()?;

        debug!(records = points.len(), "Loaded historical records from CSV");
        Ok(points)
    }
}
