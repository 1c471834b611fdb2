use crate::interval::{clamp, merge_union, overlap_with_union, union_seconds};
use crate::models::{Card, CardCoverage, Rating, ReviewSegment, ReviewStats, TimeInterval};

/// Cards with less than this share of their span rated count as unreviewed.
pub const REVIEW_COVERAGE_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTotals {
    pub focus: i64,
    pub neutral: i64,
    pub distracted: i64,
}

impl RatingTotals {
    pub fn covered(&self) -> i64 {
        self.focus + self.neutral + self.distracted
    }

    fn add(&mut self, rating: Rating, seconds: i64) {
        match rating {
            Rating::Focus => self.focus += seconds,
            Rating::Neutral => self.neutral += seconds,
            Rating::Distracted => self.distracted += seconds,
        }
    }
}

pub fn rating_totals(
    reviews: &[ReviewSegment],
    scope: TimeInterval,
    tracked_union: &[TimeInterval],
) -> RatingTotals {
    let mut totals = RatingTotals::default();
    for review in reviews {
        if let Some(clipped) = clamp(review.interval(), scope) {
            totals.add(review.rating, overlap_with_union(clipped, tracked_union));
        }
    }
    totals
}

/// Share of each non-System card's span overlapped by any rating.
pub fn card_coverage(cards: &[Card], reviews: &[ReviewSegment]) -> Vec<CardCoverage> {
    let intervals: Vec<TimeInterval> = reviews.iter().map(ReviewSegment::interval).collect();
    let rated = merge_union(&intervals);

    cards
        .iter()
        .filter(|card| !card.is_system())
        .map(|card| {
            let card_seconds = card.duration_secs();
            let covered_seconds = overlap_with_union(card.interval(), &rated);
            let fraction = if card_seconds > 0 {
                covered_seconds as f64 / card_seconds as f64
            } else {
                0.0
            };
            CardCoverage {
                card_id: card.id,
                card_seconds,
                covered_seconds,
                fraction,
            }
        })
        .collect()
}

pub fn review_stats(
    cards: &[Card],
    reviews: &[ReviewSegment],
    scope: TimeInterval,
    tracked_union: &[TimeInterval],
) -> ReviewStats {
    let tracked_non_system_seconds = union_seconds(tracked_union);
    let totals = rating_totals(reviews, scope, tracked_union);
    let covered_seconds = totals.covered();

    let coverage_fraction = if tracked_non_system_seconds > 0 {
        (covered_seconds as f64 / tracked_non_system_seconds as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let unreviewed_card_count = card_coverage(cards, reviews)
        .iter()
        .filter(|coverage| coverage.fraction < REVIEW_COVERAGE_THRESHOLD)
        .count();

    ReviewStats {
        tracked_non_system_seconds,
        covered_seconds,
        coverage_fraction,
        focus_seconds: totals.focus,
        neutral_seconds: totals.neutral,
        distracted_seconds: totals.distracted,
        unreviewed_card_count,
    }
}
