//! Next-departure calculation against headway timetables.

use std::fmt;

use chrono::NaiveDateTime;

use crate::models::schedule::{DayType, ScheduleDescriptor, TimeOfDay};

/// Outcome of asking when the next vehicle leaves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum NextDeparture {
    /// The line has no timetable
    Unavailable,
    /// Service has not started yet today
    FirstDeparture { at: TimeOfDay },
    /// Past the end of service
    ServiceEnded { resumes_at: TimeOfDay },
    /// Still within service hours, but the next headway slot falls after the end
    NoMoreDepartures { resumes_at: TimeOfDay },
    Upcoming { at: TimeOfDay, wait_minutes: u32 },
}

impl fmt::Display for NextDeparture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "Schedule unavailable"),
            Self::FirstDeparture { at } => write!(f, "First departure at {}", at),
            Self::ServiceEnded { resumes_at } => {
                write!(f, "Service ended - resumes at {}", resumes_at)
            }
            Self::NoMoreDepartures { resumes_at } => {
                write!(f, "Last departure gone - resumes at {}", resumes_at)
            }
            Self::Upcoming { at, wait_minutes } => write!(f, "{} (in {} min)", at, wait_minutes),
        }
    }
}

/// Next departure on `schedule` at or after `now`.
///
/// Saturday and Sunday use the weekend hours. A departure exactly at `now`
/// counts with a wait of zero, and the last departure may fall exactly on the
/// end of service.
pub fn next_departure(schedule: &ScheduleDescriptor, now: NaiveDateTime) -> NextDeparture {
    let day = schedule.for_day(DayType::of(&now));

    let current = TimeOfDay::of(&now).minutes();
    let start = day.start.minutes();
    let end = day.end.minutes();

    if current < start {
        return NextDeparture::FirstDeparture { at: day.start };
    }
    if current > end || day.headway_minutes == 0 {
        return NextDeparture::ServiceEnded { resumes_at: day.start };
    }

    let elapsed = current - start;
    let offset = elapsed.div_ceil(day.headway_minutes) * day.headway_minutes;
    let departure = start + offset;

    match TimeOfDay::from_minutes(departure) {
        Some(at) if departure <= end => NextDeparture::Upcoming {
            at,
            wait_minutes: departure - current,
        },
        _ => NextDeparture::NoMoreDepartures { resumes_at: day.start },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::DaySchedule;
    use chrono::NaiveDate;

    fn schedule() -> ScheduleDescriptor {
        ScheduleDescriptor {
            weekday: DaySchedule::new(TimeOfDay::hm(6, 0), TimeOfDay::hm(22, 0), 10),
            weekend: DaySchedule::new(TimeOfDay::hm(7, 0), TimeOfDay::hm(21, 0), 15),
        }
    }

    // 2024-05-06 is a Monday, 2024-05-04 a Saturday
    fn monday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn saturday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 4).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_before_service() {
        assert_eq!(
            next_departure(&schedule(), monday(5, 30)),
            NextDeparture::FirstDeparture { at: TimeOfDay::hm(6, 0) }
        );
    }

    #[test]
    fn test_start_boundary_departs_now() {
        assert_eq!(
            next_departure(&schedule(), monday(6, 0)),
            NextDeparture::Upcoming { at: TimeOfDay::hm(6, 0), wait_minutes: 0 }
        );
    }

    #[test]
    fn test_rounds_up_to_next_headway() {
        assert_eq!(
            next_departure(&schedule(), monday(6, 1)),
            NextDeparture::Upcoming { at: TimeOfDay::hm(6, 10), wait_minutes: 9 }
        );
        assert_eq!(
            next_departure(&schedule(), monday(12, 30)),
            NextDeparture::Upcoming { at: TimeOfDay::hm(12, 30), wait_minutes: 0 }
        );
    }

    #[test]
    fn test_last_departure_on_end_boundary() {
        assert_eq!(
            next_departure(&schedule(), monday(21, 55)),
            NextDeparture::Upcoming { at: TimeOfDay::hm(22, 0), wait_minutes: 5 }
        );
        assert_eq!(
            next_departure(&schedule(), monday(22, 0)),
            NextDeparture::Upcoming { at: TimeOfDay::hm(22, 0), wait_minutes: 0 }
        );
    }

    #[test]
    fn test_after_service() {
        assert_eq!(
            next_departure(&schedule(), monday(22, 5)),
            NextDeparture::ServiceEnded { resumes_at: TimeOfDay::hm(6, 0) }
        );
    }

    #[test]
    fn test_next_multiple_past_end() {
        // Headway 25 from 06:00 never lands on 07:00
        let odd = ScheduleDescriptor {
            weekday: DaySchedule::new(TimeOfDay::hm(6, 0), TimeOfDay::hm(7, 0), 25),
            weekend: DaySchedule::new(TimeOfDay::hm(6, 0), TimeOfDay::hm(7, 0), 25),
        };
        assert_eq!(
            next_departure(&odd, monday(6, 55)),
            NextDeparture::NoMoreDepartures { resumes_at: TimeOfDay::hm(6, 0) }
        );
        assert_eq!(
            next_departure(&odd, monday(6, 55)).to_string(),
            "Last departure gone - resumes at 06:00"
        );
        // Past the end is reported differently
        assert_eq!(
            next_departure(&odd, monday(7, 1)),
            NextDeparture::ServiceEnded { resumes_at: TimeOfDay::hm(6, 0) }
        );
    }

    #[test]
    fn test_weekend_schedule() {
        assert_eq!(
            next_departure(&schedule(), saturday(6, 30)),
            NextDeparture::FirstDeparture { at: TimeOfDay::hm(7, 0) }
        );
        assert_eq!(
            next_departure(&schedule(), saturday(7, 20)),
            NextDeparture::Upcoming { at: TimeOfDay::hm(7, 30), wait_minutes: 10 }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(NextDeparture::Unavailable.to_string(), "Schedule unavailable");
        assert_eq!(
            next_departure(&schedule(), monday(5, 0)).to_string(),
            "First departure at 06:00"
        );
        assert_eq!(
            next_departure(&schedule(), monday(23, 0)).to_string(),
            "Service ended - resumes at 06:00"
        );
        assert_eq!(next_departure(&schedule(), monday(8, 3)).to_string(), "08:10 (in 7 min)");
    }
}
