use std::collections::HashMap;
use std::hash::Hash;

use log::warn;

use crate::calendar::{days_in_scope, split_by_day, DayCalendar};
use crate::error::StatsError;
use crate::models::{AttributedSegment, CategoryTotal, DayTotals, TimeInterval, TitleTotal};

pub const TOP_CATEGORIES: usize = 50;
pub const TOP_TITLES: usize = 30;

/// Keep positive totals, sort descending by seconds (ties by key) and truncate.
pub fn top_n<K: Ord + Hash>(totals: HashMap<K, i64>, limit: usize) -> Vec<(K, i64)> {
    let mut values: Vec<(K, i64)> = totals
        .into_iter()
        .filter(|(_, seconds)| *seconds > 0)
        .collect();
    values.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    values.truncate(limit);
    values
}

fn sum_by_category<'a, I>(parts: I) -> HashMap<String, i64>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut totals: HashMap<String, i64> = HashMap::new();
    for (category, seconds) in parts {
        *totals.entry(category.to_string()).or_insert(0) += seconds;
    }
    totals
}

pub fn totals_by_category(segments: &[AttributedSegment], limit: usize) -> Vec<CategoryTotal> {
    let totals = sum_by_category(
        segments
            .iter()
            .map(|segment| (segment.category.as_str(), segment.duration_secs())),
    );

    top_n(totals, limit)
        .into_iter()
        .map(|(category, seconds)| CategoryTotal { category, seconds })
        .collect()
}

pub fn totals_by_title(segments: &[AttributedSegment], limit: usize) -> Vec<TitleTotal> {
    let mut totals: HashMap<(String, String), i64> = HashMap::new();
    for segment in segments {
        *totals
            .entry((segment.category.clone(), segment.title.clone()))
            .or_insert(0) += segment.duration_secs();
    }

    top_n(totals, limit)
        .into_iter()
        .map(|((category, title), seconds)| TitleTotal {
            category,
            title,
            seconds,
        })
        .collect()
}

/// Tracked and per-category seconds for every day touching `scope`.
///
/// Days without activity are still listed, with zero totals.
pub fn per_day_totals<C: DayCalendar + ?Sized>(
    segments: &[AttributedSegment],
    scope: TimeInterval,
    calendar: &C,
) -> Result<Vec<DayTotals>, StatsError> {
    let days = days_in_scope(scope, calendar)?;
    let index: HashMap<&str, usize> = days
        .iter()
        .enumerate()
        .map(|(i, (key, _))| (key.as_str(), i))
        .collect();

    let mut tracked = vec![0i64; days.len()];
    let mut categories: Vec<HashMap<String, i64>> = vec![HashMap::new(); days.len()];

    for segment in segments {
        for slice in split_by_day(segment.interval(), scope, calendar)? {
            let Some(&i) = index.get(slice.day_key.as_str()) else {
                warn!("slice day {} is outside the scope's days", slice.day_key);
                continue;
            };
            tracked[i] += slice.duration_secs();
            *categories[i]
                .entry(segment.category.clone())
                .or_insert(0) += slice.duration_secs();
        }
    }

    Ok(days
        .iter()
        .zip(tracked)
        .zip(categories)
        .map(|(((day_key, window), tracked_seconds), by_category)| DayTotals {
            day_key: day_key.clone(),
            start_ts: window.start_ts,
            end_ts: window.end_ts,
            tracked_seconds,
            by_category_seconds: top_n(by_category, usize::MAX)
                .into_iter()
                .map(|(category, seconds)| CategoryTotal { category, seconds })
                .collect(),
        })
        .collect())
}

/// Longest run of `category` time where each segment starts at or before the
/// end of the run so far.
pub fn longest_block_seconds(segments: &[AttributedSegment], category: &str) -> i64 {
    let mut matching: Vec<TimeInterval> = segments
        .iter()
        .filter(|segment| segment.category == category)
        .map(AttributedSegment::interval)
        .collect();
    matching.sort_by_key(|interval| interval.start_ts);

    let mut longest = 0;
    let mut current: Option<TimeInterval> = None;

    for interval in matching {
        current = match current {
            Some(mut block) if interval.start_ts <= block.end_ts => {
                block.end_ts = block.end_ts.max(interval.end_ts);
                Some(block)
            }
            _ => Some(interval),
        };
        if let Some(block) = current {
            longest = longest.max(block.duration_secs());
        }
    }

    longest
}
