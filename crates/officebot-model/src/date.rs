//! Dates with explicit precision
//!
//! Infobox dates are frequently partial ("1918", "març de 1920"). A
//! [`WikiDate`] keeps only the components that were actually recovered so
//! comparisons can be made on the overlapping part.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How much of a date is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Year only
    Year,
    /// Year and month
    YearMonth,
    /// Full calendar date
    Day,
}

/// Calendar date with 1-3 known components
///
/// A day is never present without a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WikiDate {
    year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day: Option<u8>,
}

impl WikiDate {
    /// Build a date, validating component ranges
    ///
    /// # Errors
    /// `ModelError::InvalidDate` when the month or day is out of range or a
    /// day is given without a month.
    pub fn new(year: i32, month: Option<u8>, day: Option<u8>) -> Result<Self, ModelError> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(ModelError::invalid_date(format!("month {m} out of range")));
            }
        }
        match (month, day) {
            (None, Some(_)) => {
                return Err(ModelError::invalid_date("day without month"));
            }
            (_, Some(d)) if !(1..=31).contains(&d) => {
                return Err(ModelError::invalid_date(format!("day {d} out of range")));
            }
            _ => {}
        }
        Ok(Self { year, month, day })
    }

    /// Year-precision date
    #[inline]
    #[must_use]
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Year-month-precision date
    ///
    /// # Errors
    /// `ModelError::InvalidDate` for an out-of-range month.
    pub fn year_month(year: i32, month: u8) -> Result<Self, ModelError> {
        Self::new(year, Some(month), None)
    }

    /// Day-precision date
    ///
    /// # Errors
    /// `ModelError::InvalidDate` for out-of-range components.
    pub fn ymd(year: i32, month: u8, day: u8) -> Result<Self, ModelError> {
        Self::new(year, Some(month), Some(day))
    }

    /// Year component
    #[inline]
    #[must_use]
    pub fn year_value(&self) -> i32 {
        self.year
    }

    /// Month component, if known
    #[inline]
    #[must_use]
    pub fn month(&self) -> Option<u8> {
        self.month
    }

    /// Day component, if known
    #[inline]
    #[must_use]
    pub fn day(&self) -> Option<u8> {
        self.day
    }

    /// Precision derived from the known components
    #[must_use]
    pub fn precision(&self) -> Precision {
        match (self.month, self.day) {
            (Some(_), Some(_)) => Precision::Day,
            (Some(_), None) => Precision::YearMonth,
            _ => Precision::Year,
        }
    }

    /// Compare on the components both dates know
    ///
    /// `1920` agrees with `1920-03-02`; `1920-04` does not.
    #[must_use]
    pub fn agrees_with(&self, other: &Self) -> bool {
        if self.year != other.year {
            return false;
        }
        if let (Some(a), Some(b)) = (self.month, other.month) {
            if a != b {
                return false;
            }
        }
        if let (Some(a), Some(b)) = (self.day, other.day) {
            if a != b {
                return false;
            }
        }
        true
    }

    /// True when `self` is a strictly more precise version of `coarser`
    #[must_use]
    pub fn refines(&self, coarser: &Self) -> bool {
        self.precision() > coarser.precision() && self.agrees_with(coarser)
    }
}

impl Display for WikiDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(m) = self.month {
            write!(f, "-{m:02}")?;
        }
        if let Some(d) = self.day {
            write!(f, "-{d:02}")?;
        }
        Ok(())
    }
}
