use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use log::warn;

use crate::error::StatsError;
use crate::models::{DaySlice, TimeInterval};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Maps timestamps to calendar days and back. The same calendar must be used
/// across calls for per-day totals to line up.
pub trait DayCalendar {
    fn day_key(&self, ts: i64) -> Option<String>;

    fn day_window(&self, key: &str) -> Option<TimeInterval>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCalendar;

impl DayCalendar for LocalCalendar {
    fn day_key(&self, ts: i64) -> Option<String> {
        day_key_in(&Local, ts)
    }

    fn day_window(&self, key: &str) -> Option<TimeInterval> {
        day_window_in(&Local, key)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedOffsetCalendar {
    offset: FixedOffset,
}

impl FixedOffsetCalendar {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Returns `None` when the offset is a day or more away from UTC.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Some(Self { offset })
    }
}

impl DayCalendar for FixedOffsetCalendar {
    fn day_key(&self, ts: i64) -> Option<String> {
        day_key_in(&self.offset, ts)
    }

    fn day_window(&self, key: &str) -> Option<TimeInterval> {
        day_window_in(&self.offset, key)
    }
}

fn day_key_in<Tz: TimeZone>(tz: &Tz, ts: i64) -> Option<String> {
    let utc = DateTime::from_timestamp(ts, 0)?;
    let date = utc.with_timezone(tz).date_naive();
    Some(date.format(DAY_KEY_FORMAT).to_string())
}

fn day_window_in<Tz: TimeZone>(tz: &Tz, key: &str) -> Option<TimeInterval> {
    let date = NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()?;
    let start = start_of_day(tz, date)?;
    let end = start_of_day(tz, date.succ_opt()?)?;
    Some(TimeInterval::new(start, end))
}

/// First instant of `date` in `tz`. Where midnight falls in a DST gap the day
/// starts at the first hour that exists.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    (0..3).find_map(|hour| {
        tz.from_local_datetime(&(midnight + Duration::hours(hour)))
            .earliest()
            .map(|instant| instant.timestamp())
    })
}

pub fn window_containing<C: DayCalendar + ?Sized>(
    calendar: &C,
    ts: i64,
) -> Result<(String, TimeInterval), StatsError> {
    let key = calendar.day_key(ts).ok_or(StatsError::DayKey(ts))?;
    let window = calendar.day_window(&key).ok_or(StatsError::DayKey(ts))?;

    if window.start_ts > ts || window.end_ts <= ts {
        warn!(
            "calendar window {}..{} for {} does not contain {}",
            window.start_ts, window.end_ts, key, ts
        );
        return Err(StatsError::DayWindow {
            key,
            start_ts: window.start_ts,
            end_ts: window.end_ts,
            cursor: ts,
        });
    }

    Ok((key, window))
}

/// Cut `interval` (clipped to `scope`) into slices that never cross a day
/// boundary. Every slice has positive duration.
pub fn split_by_day<C: DayCalendar + ?Sized>(
    interval: TimeInterval,
    scope: TimeInterval,
    calendar: &C,
) -> Result<Vec<DaySlice>, StatsError> {
    let end = interval.end_ts.min(scope.end_ts);
    let mut cursor = interval.start_ts.max(scope.start_ts);
    let mut slices = Vec::new();

    while cursor < end {
        let (day_key, window) = window_containing(calendar, cursor)?;
        let part_end = end.min(window.end_ts);
        slices.push(DaySlice {
            start_ts: cursor,
            end_ts: part_end,
            day_key,
        });
        cursor = part_end;
    }

    Ok(slices)
}

/// Every day touching `scope`, in chronological order, with its full window.
pub fn days_in_scope<C: DayCalendar + ?Sized>(
    scope: TimeInterval,
    calendar: &C,
) -> Result<Vec<(String, TimeInterval)>, StatsError> {
    let mut days = Vec::new();
    let mut cursor = scope.start_ts;

    while cursor < scope.end_ts {
        let (key, window) = window_containing(calendar, cursor)?;
        cursor = window.end_ts;
        days.push((key, window));
    }

    Ok(days)
}

/// Scope covering the last `days` calendar days, ending with the day that
/// contains `now_ts`.
pub fn trailing_days_scope<C: DayCalendar + ?Sized>(
    calendar: &C,
    now_ts: i64,
    days: u32,
) -> Result<TimeInterval, StatsError> {
    let (_, today) = window_containing(calendar, now_ts)?;
    let mut start = today.start_ts;

    for _ in 1..days.max(1) {
        let (_, previous) = window_containing(calendar, start - 1)?;
        start = previous.start_ts;
    }

    Ok(TimeInterval::new(start, today.end_ts))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;
    // 2026-10-14T00:00:00Z
    const OCT_14: i64 = 1_791_936_000;

    #[test]
    fn utc_day_window_round_trips() {
        let calendar = FixedOffsetCalendar::utc();
        assert_eq!(calendar.day_key(OCT_14 + 3600).as_deref(), Some("2026-10-14"));
        assert_eq!(
            calendar.day_window("2026-10-14"),
            Some(TimeInterval::new(OCT_14, OCT_14 + DAY))
        );
        assert_eq!(calendar.day_window("not-a-day"), None);
    }

    #[test]
    fn offset_calendar_shifts_boundaries() {
        let calendar = FixedOffsetCalendar::from_offset_minutes(120).unwrap();
        // 23:00 UTC on the 14th is already the 15th at +02:00.
        assert_eq!(
            calendar.day_key(OCT_14 + 23 * 3600).as_deref(),
            Some("2026-10-15")
        );
        let window = calendar.day_window("2026-10-15").unwrap();
        assert_eq!(window.start_ts, OCT_14 + DAY - 2 * 3600);
        assert_eq!(window.duration_secs(), DAY);
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        assert!(FixedOffsetCalendar::from_offset_minutes(24 * 60).is_none());
        assert!(FixedOffsetCalendar::from_offset_minutes(-330).is_some());
    }

    #[test]
    fn split_across_midnight_yields_two_slices() {
        let calendar = FixedOffsetCalendar::utc();
        let scope = TimeInterval::new(OCT_14, OCT_14 + 2 * DAY);
        let segment = TimeInterval::new(OCT_14 + DAY - 600, OCT_14 + DAY + 900);

        let slices = split_by_day(segment, scope, &calendar).unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].day_key, "2026-10-14");
        assert_eq!(slices[0].duration_secs(), 600);
        assert_eq!(slices[1].day_key, "2026-10-15");
        assert_eq!(slices[1].duration_secs(), 900);
    }

    #[test]
    fn split_clips_to_scope() {
        let calendar = FixedOffsetCalendar::utc();
        let scope = TimeInterval::new(OCT_14 + 100, OCT_14 + 200);
        let slices =
            split_by_day(TimeInterval::new(OCT_14, OCT_14 + 1000), scope, &calendar).unwrap();
        assert_eq!(
            slices,
            vec![DaySlice {
                start_ts: OCT_14 + 100,
                end_ts: OCT_14 + 200,
                day_key: "2026-10-14".to_string(),
            }]
        );
    }

    #[test]
    fn split_outside_scope_is_empty() {
        let calendar = FixedOffsetCalendar::utc();
        let scope = TimeInterval::new(OCT_14, OCT_14 + 100);
        let slices = split_by_day(
            TimeInterval::new(OCT_14 + 500, OCT_14 + 600),
            scope,
            &calendar,
        )
        .unwrap();
        assert!(slices.is_empty());
    }

    #[test]
    fn days_in_scope_includes_partial_days() {
        let calendar = FixedOffsetCalendar::utc();
        let scope = TimeInterval::new(OCT_14 + 3600, OCT_14 + 2 * DAY + 60);
        let keys: Vec<String> = days_in_scope(scope, &calendar)
            .unwrap()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["2026-10-14", "2026-10-15", "2026-10-16"]);
    }

    #[test]
    fn trailing_days_scope_ends_with_today() {
        let calendar = FixedOffsetCalendar::utc();
        let scope = trailing_days_scope(&calendar, OCT_14 + 2 * DAY + 42, 3).unwrap();
        assert_eq!(scope, TimeInterval::new(OCT_14, OCT_14 + 3 * DAY));
    }

    struct BrokenCalendar;

    impl DayCalendar for BrokenCalendar {
        fn day_key(&self, _ts: i64) -> Option<String> {
            Some("stuck".to_string())
        }

        fn day_window(&self, _key: &str) -> Option<TimeInterval> {
            Some(TimeInterval::new(0, 10))
        }
    }

    #[test]
    fn inconsistent_calendar_is_an_error_not_a_loop() {
        let scope = TimeInterval::new(0, 100);
        let result = split_by_day(TimeInterval::new(0, 100), scope, &BrokenCalendar);
        assert!(matches!(result, Err(StatsError::DayWindow { cursor: 10, .. })));
    }
}
