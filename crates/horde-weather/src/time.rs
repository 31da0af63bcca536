//! Day/hour/minute stamps as they appear in reports.
//!
//! Reports only carry the day of month, so turning a stamp into an absolute
//! timestamp needs a reference instant (usually "now" or the fetch time).
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use horde_weather::ReportTime;
//!
//! let stamp = ReportTime::new(Some(31), 23, 50).unwrap();
//! let now = Utc.with_ymd_and_hms(2024, 8, 1, 0, 10, 0).unwrap();
//!
//! let resolved = stamp.resolve(now).unwrap();
//! assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 7, 31, 23, 50, 0).unwrap());
//! ```

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::fmt;

/// A report time stamp with an optional day of month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReportTime {
    /// Day of month (1-31), absent in legacy groups
    pub day: Option<u8>,
    /// Hour (0-24, where 24 means midnight at the end of the day)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
}

impl ReportTime {
    /// Creates a validated stamp.
    ///
    /// Returns `None` when a field is out of range.
    #[must_use]
    pub fn new(day: Option<u8>, hour: u8, minute: u8) -> Option<Self> {
        if day.is_some_and(|d| !(1..=31).contains(&d)) || hour > 24 || minute > 59 {
            return None;
        }
        if hour == 24 && minute != 0 {
            return None;
        }
        Some(Self { day, hour, minute })
    }

    /// Builds a stamp from the two-digit strings captured by a report regex.
    pub(crate) fn from_parts(day: Option<&str>, hour: &str, minute: &str) -> Option<Self> {
        let day = match day {
            Some(d) => Some(d.parse().ok()?),
            None => None,
        };
        Self::new(day, hour.parse().ok()?, minute.parse().ok()?)
    }

    /// Places the stamp on the calendar relative to `reference`.
    ///
    /// The day is tried in the month before, the month of and the month
    /// after the reference; the candidate closest to the reference wins.
    /// Without a day the reference date is used.
    #[must_use]
    pub fn resolve(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let (hour, extra_days) = if self.hour == 24 {
            (0, 1)
        } else {
            (self.hour, 0)
        };
        let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(self.minute), 0)?;
        let place = |date: NaiveDate| {
            date.checked_add_days(Days::new(extra_days))
                .map(|d| d.and_time(time).and_utc())
        };

        let reference_date = reference.date_naive();
        let Some(day) = self.day else {
            return place(reference_date);
        };

        [-1, 0, 1]
            .into_iter()
            .filter_map(|offset| {
                let (year, month) =
                    shift_month(reference_date.year(), reference_date.month(), offset);
                NaiveDate::from_ymd_opt(year, month, u32::from(day))
            })
            .filter_map(place)
            .min_by_key(|candidate| (*candidate - reference).num_seconds().abs())
    }
}

fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + offset;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

impl fmt::Display for ReportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(day) = self.day {
            write!(f, "{day:02}")?;
        }
        write!(f, "{:02}{:02}Z", self.hour, self.minute)
    }
}
