//! Headway-based service timetables.
//!
//! A line runs a uniform headway between a first and last departure, with
//! separate hours on weekdays and at the weekend.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::models::types::{Result, TransitError};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time with minute precision, stored as minutes since midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build a time for compiled-in tables.
    ///
    /// Panics (at compile time when used in a const) if the time is out of range.
    pub const fn hm(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60, "time of day out of range");
        Self(hour * 60 + minute)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self((hour * 60 + minute) as u16))
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY as u32).then(|| Self(minutes as u16))
    }

    /// Time of day of a timestamp, seconds truncated.
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self((timestamp.hour() * 60 + timestamp.minute()) as u16)
    }

    pub fn minutes(&self) -> u32 {
        self.0 as u32
    }

    pub fn hour(&self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes() % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TransitError::InvalidTime(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;

        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TimeOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Weekday or weekend service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        match timestamp.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }
}

/// Service hours and headway for one day type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DaySchedule {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[cfg_attr(feature = "serde", serde(rename = "frequency"))]
    pub headway_minutes: u32,
}

impl DaySchedule {
    pub const fn new(start: TimeOfDay, end: TimeOfDay, headway_minutes: u32) -> Self {
        Self {
            start,
            end,
            headway_minutes,
        }
    }

    /// Start before end and a positive headway
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(TransitError::InvalidData(format!(
                "Service start {} is not before end {}",
                self.start, self.end
            )));
        }
        if self.headway_minutes == 0 {
            return Err(TransitError::InvalidData("Headway must be positive".to_string()));
        }
        Ok(())
    }

    /// Scheduled departures from start to end, inclusive.
    pub fn departures(&self) -> impl Iterator<Item = TimeOfDay> + '_ {
        let step = self.headway_minutes.max(1) as usize;
        (self.start.minutes()..=self.end.minutes())
            .step_by(step)
            .filter_map(TimeOfDay::from_minutes)
    }
}

/// Weekday and weekend service for a line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleDescriptor {
    pub weekday: DaySchedule,
    pub weekend: DaySchedule,
}

impl ScheduleDescriptor {
    pub fn for_day(&self, day: DayType) -> &DaySchedule {
        match day {
            DayType::Weekday => &self.weekday,
            DayType::Weekend => &self.weekend,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.weekday.validate()?;
        self.weekend.validate()
    }
}
