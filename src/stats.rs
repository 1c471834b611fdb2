use log::debug;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    longest_block_seconds, per_day_totals, totals_by_category, totals_by_title, TOP_CATEGORIES,
    TOP_TITLES,
};
use crate::attribution::attribute;
use crate::calendar::DayCalendar;
use crate::error::StatsError;
use crate::interval::clamp;
use crate::models::{
    BlockStats, Card, DashboardStats, Rating, RawCard, RawReviewSegment, ReviewSegment,
    TimeInterval,
};
use crate::review::review_stats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsOptions {
    /// Let System cards fill time no other card claimed.
    pub include_system: bool,
    /// Category whose longest contiguous block is reported.
    pub focus_category: String,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            include_system: false,
            focus_category: "Work".into(),
        }
    }
}

fn whole_seconds(value: Option<f64>) -> Option<i64> {
    let value = value?;
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    if floored < i64::MIN as f64 || floored > i64::MAX as f64 {
        return None;
    }
    Some(floored as i64)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validate a raw card and clamp it to `scope`. Returns `None` for anything
/// malformed or outside the scope.
pub fn sanitize_card(raw: &RawCard, scope: TimeInterval) -> Option<Card> {
    let id = raw.id.filter(|id| id.is_finite() && id.fract() == 0.0)?;
    let start_ts = whole_seconds(raw.start_ts)?;
    let end_ts = whole_seconds(raw.end_ts)?;
    if end_ts <= start_ts {
        return None;
    }
    let category = non_blank(raw.category.as_ref())?;
    let title = non_blank(raw.title.as_ref())?;
    let span = clamp(TimeInterval::new(start_ts, end_ts), scope)?;

    Some(Card {
        id: id as i64,
        start_ts: span.start_ts,
        end_ts: span.end_ts,
        category,
        title,
    })
}

pub fn sanitize_review(raw: &RawReviewSegment) -> Option<ReviewSegment> {
    let start_ts = whole_seconds(raw.start_ts)?;
    let end_ts = whole_seconds(raw.end_ts)?;
    if end_ts <= start_ts {
        return None;
    }
    let rating = Rating::parse(raw.rating.as_deref()?)?;

    Some(ReviewSegment {
        start_ts,
        end_ts,
        rating,
    })
}

/// Compute dashboard statistics for one scope.
///
/// Malformed cards and rating segments are dropped. The scope itself must be
/// non-empty and narrow enough for its width to fit in an `i64`.
pub fn compute_stats<C: DayCalendar + ?Sized>(
    scope: TimeInterval,
    raw_cards: &[RawCard],
    raw_reviews: &[RawReviewSegment],
    options: &StatsOptions,
    calendar: &C,
) -> Result<DashboardStats, StatsError> {
    if scope.end_ts <= scope.start_ts {
        return Err(StatsError::InvalidScope {
            start_ts: scope.start_ts,
            end_ts: scope.end_ts,
        });
    }
    let window_seconds = scope
        .end_ts
        .checked_sub(scope.start_ts)
        .ok_or(StatsError::ScopeTooWide {
            start_ts: scope.start_ts,
            end_ts: scope.end_ts,
        })?;

    let cards: Vec<Card> = raw_cards
        .iter()
        .filter_map(|raw| sanitize_card(raw, scope))
        .collect();
    let reviews: Vec<ReviewSegment> = raw_reviews.iter().filter_map(sanitize_review).collect();
    debug!(
        "using {}/{} cards and {}/{} rating segments for scope {}..{}",
        cards.len(),
        raw_cards.len(),
        reviews.len(),
        raw_reviews.len(),
        scope.start_ts,
        scope.end_ts
    );

    let attribution = attribute(&cards, options.include_system);
    let segments = &attribution.segments;

    let tracked_seconds: i64 = segments.iter().map(|s| s.duration_secs()).sum();
    let system_seconds: i64 = attribution
        .system_segments
        .iter()
        .map(|s| s.duration_secs())
        .sum();

    let per_day = per_day_totals(segments, scope, calendar)?;
    let review = review_stats(&cards, &reviews, scope, &attribution.primary_union);

    Ok(DashboardStats {
        scope,
        include_system: options.include_system,
        window_seconds,
        tracked_seconds,
        untracked_seconds: window_seconds - tracked_seconds,
        system_seconds,
        card_count: cards.len(),
        review_segment_count: reviews.len(),
        by_category_seconds: totals_by_category(segments, TOP_CATEGORIES),
        by_title_seconds: totals_by_title(segments, TOP_TITLES),
        per_day,
        review,
        blocks: BlockStats {
            longest_work_block_seconds: longest_block_seconds(segments, &options.focus_category),
        },
    })
}
