use crate::models::TimeInterval;

/// Touching intervals (`a.end == b.start`) are merged as contiguous.
pub fn merge_union(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted: Vec<TimeInterval> = intervals
        .iter()
        .copied()
        .filter(|interval| !interval.is_empty())
        .collect();
    sorted.sort_by_key(|interval| (interval.start_ts, interval.end_ts));

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start_ts <= last.end_ts => {
                last.end_ts = last.end_ts.max(interval.end_ts);
            }
            _ => merged.push(interval),
        }
    }

    merged
}

/// Return the parts of `interval` not covered by `union`, left to right.
///
/// `union` must already be sorted and disjoint (the output of [`merge_union`]).
pub fn subtract_union(interval: TimeInterval, union: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut pieces = Vec::new();
    let mut cursor = interval.start_ts;

    for covered in union {
        if covered.end_ts <= cursor {
            continue;
        }
        if covered.start_ts >= interval.end_ts {
            break;
        }
        if covered.start_ts > cursor {
            pieces.push(TimeInterval::new(cursor, covered.start_ts));
        }
        cursor = cursor.max(covered.end_ts);
        if cursor >= interval.end_ts {
            break;
        }
    }

    if cursor < interval.end_ts {
        pieces.push(TimeInterval::new(cursor, interval.end_ts));
    }

    pieces.retain(|piece| !piece.is_empty());
    pieces
}

pub fn overlap_seconds(a: TimeInterval, b: TimeInterval) -> i64 {
    (a.end_ts.min(b.end_ts) - a.start_ts.max(b.start_ts)).max(0)
}

/// Seconds `interval` shares with a sorted disjoint union.
pub fn overlap_with_union(interval: TimeInterval, union: &[TimeInterval]) -> i64 {
    union
        .iter()
        .take_while(|covered| covered.start_ts < interval.end_ts)
        .map(|covered| overlap_seconds(interval, *covered))
        .sum()
}

pub fn union_seconds(union: &[TimeInterval]) -> i64 {
    union.iter().map(TimeInterval::duration_secs).sum()
}

pub fn clamp(interval: TimeInterval, scope: TimeInterval) -> Option<TimeInterval> {
    let clipped = TimeInterval::new(
        interval.start_ts.max(scope.start_ts),
        interval.end_ts.min(scope.end_ts),
    );
    (!clipped.is_empty()).then_some(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start_ts: i64, end_ts: i64) -> TimeInterval {
        TimeInterval::new(start_ts, end_ts)
    }

    #[test]
    fn merge_union_sorts_and_merges_overlaps() {
        let merged = merge_union(&[iv(50, 70), iv(0, 10), iv(5, 20), iv(60, 65)]);
        assert_eq!(merged, vec![iv(0, 20), iv(50, 70)]);
    }

    #[test]
    fn merge_union_joins_touching_intervals() {
        let merged = merge_union(&[iv(10, 20), iv(0, 10), iv(20, 30)]);
        assert_eq!(merged, vec![iv(0, 30)]);
    }

    #[test]
    fn merge_union_of_nothing_is_empty() {
        assert!(merge_union(&[]).is_empty());
    }

    #[test]
    fn subtract_union_carves_gaps() {
        let union = vec![iv(10, 20), iv(30, 40)];
        let pieces = subtract_union(iv(0, 50), &union);
        assert_eq!(pieces, vec![iv(0, 10), iv(20, 30), iv(40, 50)]);
    }

    #[test]
    fn subtract_union_skips_intervals_before_cursor_and_stops_after_end() {
        let union = vec![iv(0, 5), iv(12, 15), iv(100, 200)];
        let pieces = subtract_union(iv(10, 20), &union);
        assert_eq!(pieces, vec![iv(10, 12), iv(15, 20)]);
    }

    #[test]
    fn subtract_union_fully_covered_is_empty() {
        let union = vec![iv(0, 100)];
        assert!(subtract_union(iv(10, 20), &union).is_empty());
    }

    #[test]
    fn subtract_union_drops_zero_length_pieces() {
        let union = vec![iv(0, 10), iv(10, 20)];
        assert_eq!(subtract_union(iv(0, 25), &union), vec![iv(20, 25)]);
    }

    #[test]
    fn overlap_seconds_is_never_negative() {
        assert_eq!(overlap_seconds(iv(0, 10), iv(5, 20)), 5);
        assert_eq!(overlap_seconds(iv(0, 10), iv(10, 20)), 0);
        assert_eq!(overlap_seconds(iv(0, 10), iv(30, 40)), 0);
    }

    #[test]
    fn overlap_with_union_sums_each_piece() {
        let union = vec![iv(0, 10), iv(20, 30), iv(40, 50)];
        assert_eq!(overlap_with_union(iv(5, 45), &union), 5 + 10 + 5);
    }

    #[test]
    fn clamp_drops_intervals_outside_scope() {
        let scope = iv(100, 200);
        assert_eq!(clamp(iv(50, 150), scope), Some(iv(100, 150)));
        assert_eq!(clamp(iv(0, 100), scope), None);
        assert_eq!(clamp(iv(250, 300), scope), None);
    }
}
