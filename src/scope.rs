use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_SCOPE: &str = "yesterday";

/// How far back `auto` reaches, in days.
const AUTO_DAYS: i64 = 89;

lazy_static! {
    static ref ISO_DATE: Regex =
        Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])$").unwrap();
    static ref DAYS_AGO: Regex = Regex::new(r"^-([0-9]+) days?$").unwrap();
}

/// A reporting scope as configured by `REPORT_SCOPE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Today,
    Yesterday,
    LastWeek,
    Auto,
    /// `from>to`, kept with the literal it was parsed from.
    Between {
        from: Endpoint,
        to: Endpoint,
        literal: String,
    },
    Day(NaiveDate),
}

/// One side of an explicit range. Relative forms are resolved against the
/// same instant as the rest of the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Now,
    /// Midnight of the current day.
    Today,
    /// Midnight of the previous day.
    Yesterday,
    DaysAgo(u32),
    At(NaiveDateTime),
}

impl Endpoint {
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        match s {
            "now" => Some(Endpoint::Now),
            "today" => Some(Endpoint::Today),
            "yesterday" => Some(Endpoint::Yesterday),
            _ => match DAYS_AGO.captures(s) {
                Some(caps) => caps[1].parse().ok().map(Endpoint::DaysAgo),
                None => kb_accounts_api::datetime::parse(s).map(Endpoint::At),
            },
        }
    }

    fn at(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Endpoint::Now => Some(now),
            Endpoint::Today => Some(start_of_day(now.date())),
            Endpoint::Yesterday => now.date().pred_opt().map(start_of_day),
            Endpoint::DaysAgo(days) => now.checked_sub_signed(Duration::days(i64::from(*days))),
            Endpoint::At(at) => Some(*at),
        }
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidScope(s.to_string());

        match s {
            "today" => Ok(Scope::Today),
            "yesterday" => Ok(Scope::Yesterday),
            "last_week" => Ok(Scope::LastWeek),
            "auto" => Ok(Scope::Auto),
            _ if s.contains('>') => {
                let (from, to) = s.split_once('>').ok_or_else(invalid)?;
                Ok(Scope::Between {
                    from: Endpoint::parse(from).ok_or_else(invalid)?,
                    to: Endpoint::parse(to).ok_or_else(invalid)?,
                    literal: s.to_string(),
                })
            }
            _ if ISO_DATE.is_match(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Scope::Day)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Today => f.write_str("today"),
            Scope::Yesterday => f.write_str("yesterday"),
            Scope::LastWeek => f.write_str("last_week"),
            Scope::Auto => f.write_str("auto"),
            Scope::Between { literal, .. } => f.write_str(literal),
            Scope::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
        }
    }
}

/// Inclusive bounds of a report, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.from.format("%Y-%m-%dT%H:%M"),
            self.to.format("%Y-%m-%dT%H:%M")
        )
    }
}

impl Scope {
    /// Resolves the scope relative to `now`.
    ///
    /// `from` always starts at midnight and `to` ends at 23:59:59.999, except
    /// for [`Scope::Today`] whose range ends at `now` so the report never
    /// reaches into the future.
    pub fn resolve(&self, now: NaiveDateTime) -> Result<DateRange> {
        let invalid = || Error::InvalidScope(self.to_string());
        let today = now.date();
        let (from, to) = match self {
            Scope::Today => (now, now),
            Scope::Yesterday => {
                let day = (now - Duration::days(1)).date();
                (start_of_day(day), start_of_day(day))
            }
            Scope::LastWeek => {
                let this_monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                let monday = this_monday - Duration::weeks(1);
                (start_of_day(monday), start_of_day(monday + Duration::days(6)))
            }
            Scope::Auto => (now - Duration::days(AUTO_DAYS), now),
            Scope::Between { from, to, .. } => (
                from.at(now).ok_or_else(invalid)?,
                to.at(now).ok_or_else(invalid)?,
            ),
            Scope::Day(day) => (start_of_day(*day), start_of_day(*day)),
        };

        let range = DateRange {
            from: start_of_day(from.date()),
            to: match self {
                Scope::Today => to,
                _ => end_of_day(to.date()),
            },
        };

        if range.from > range.to {
            return Err(invalid());
        }

        Ok(range)
    }
}

fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    start_of_day(day) + Duration::days(1) - Duration::milliseconds(1)
}
