//! Bound resolution
//!
//! Symbolic bounds in field specifications are resolved to concrete values
//! exactly once, when a rule is compiled, so per-cell evaluation never
//! re-derives "today" or converts a fractional day again.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::models::{DateBound, DateTimeBound, TimeBound};

pub(crate) fn resolve_date_bound(bound: &DateBound) -> NaiveDate {
    match bound {
        DateBound::Literal(date) => *date,
        DateBound::RelativeToToday(offset) => {
            Local::now().date_naive() + TimeDelta::days(*offset)
        }
    }
}

pub(crate) fn resolve_datetime_bound(bound: &DateTimeBound) -> NaiveDateTime {
    match bound {
        DateTimeBound::Literal(datetime) => *datetime,
        DateTimeBound::RelativeToToday(offset) => {
            Local::now().naive_local() + TimeDelta::days(*offset)
        }
    }
}

pub(crate) fn resolve_time_bound(bound: &TimeBound) -> NaiveTime {
    match bound {
        TimeBound::Literal(time) => *time,
        TimeBound::FractionalDay(fraction) => {
            // Bounds outside a single day saturate to the day's edges
            if *fraction >= 1.0 {
                NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
                    .unwrap_or(NaiveTime::MIN)
            } else {
                fraction_to_time(*fraction).unwrap_or(NaiveTime::MIN)
            }
        }
    }
}

/// Convert a fraction of a day (the legacy spreadsheet time encoding) to a
/// time of day; `None` outside `[0, 1)`
pub(crate) fn fraction_to_time(fraction: f64) -> Option<NaiveTime> {
    if !(0.0..1.0).contains(&fraction) {
        return None;
    }
    let total_seconds = fraction * 86_400.0;
    let seconds = total_seconds as u32;
    let nanos = ((total_seconds - seconds as f64) * 1_000_000_000.0) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_to_time() {
        assert_eq!(
            fraction_to_time(0.5),
            Some(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
        );
        assert_eq!(fraction_to_time(0.0), Some(NaiveTime::MIN));
        assert_eq!(fraction_to_time(1.0), None);
        assert_eq!(fraction_to_time(-0.1), None);
    }

    #[test]
    fn test_fraction_just_before_midnight() {
        let time = fraction_to_time(0.9999999).unwrap();
        assert_eq!(time.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn test_relative_date_bound_resolves_forward() {
        let today = Local::now().date_naive();
        let resolved = resolve_date_bound(&DateBound::RelativeToToday(2));
        assert_eq!(resolved, today + TimeDelta::days(2));
    }

    #[test]
    fn test_literal_bounds_pass_through() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(resolve_date_bound(&DateBound::Literal(date)), date);

        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        assert_eq!(resolve_time_bound(&TimeBound::Literal(time)), time);
    }
}
