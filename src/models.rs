use serde::{Deserialize, Serialize};

/// Category reserved for background activity that may only fill untracked gaps.
pub const SYSTEM_CATEGORY: &str = "System";

/// Half-open `[start_ts, end_ts)` span of unix seconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    pub start_ts: i64,
    pub end_ts: i64,
}

impl TimeInterval {
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        Self { start_ts, end_ts }
    }

    pub fn duration_secs(&self) -> i64 {
        self.end_ts.saturating_sub(self.start_ts).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.end_ts <= self.start_ts
    }
}

/// A card as it arrives from upstream, before validation.
///
/// Every field is optional so that partially corrupt rows can be read and
/// dropped individually instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCard {
    pub id: Option<f64>,
    #[serde(alias = "start_ts")]
    pub start_ts: Option<f64>,
    #[serde(alias = "end_ts")]
    pub end_ts: Option<f64>,
    pub category: Option<String>,
    pub title: Option<String>,
}

impl RawCard {
    pub fn new(id: i64, start_ts: i64, end_ts: i64, category: &str, title: &str) -> Self {
        Self {
            id: Some(id as f64),
            start_ts: Some(start_ts as f64),
            end_ts: Some(end_ts as f64),
            category: Some(category.to_string()),
            title: Some(title.to_string()),
        }
    }
}

/// A validated activity record, clamped to the scope it is used in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub start_ts: i64,
    pub end_ts: i64,
    pub category: String,
    pub title: String,
}

impl Card {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_ts, self.end_ts)
    }

    pub fn duration_secs(&self) -> i64 {
        self.interval().duration_secs()
    }

    pub fn is_system(&self) -> bool {
        self.category == SYSTEM_CATEGORY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Focus,
    Neutral,
    Distracted,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Focus => "focus",
            Rating::Neutral => "neutral",
            Rating::Distracted => "distracted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "focus" => Some(Rating::Focus),
            "neutral" => Some(Rating::Neutral),
            "distracted" => Some(Rating::Distracted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawReviewSegment {
    #[serde(alias = "start_ts")]
    pub start_ts: Option<f64>,
    #[serde(alias = "end_ts")]
    pub end_ts: Option<f64>,
    pub rating: Option<String>,
}

impl RawReviewSegment {
    pub fn new(start_ts: i64, end_ts: i64, rating: &str) -> Self {
        Self {
            start_ts: Some(start_ts as f64),
            end_ts: Some(end_ts as f64),
            rating: Some(rating.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSegment {
    pub start_ts: i64,
    pub end_ts: i64,
    pub rating: Rating,
}

impl ReviewSegment {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_ts, self.end_ts)
    }
}

/// A disjoint slice of time owned by exactly one card after overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedSegment {
    pub start_ts: i64,
    pub end_ts: i64,
    pub category: String,
    pub title: String,
    pub card_id: i64,
}

impl AttributedSegment {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_ts, self.end_ts)
    }

    pub fn duration_secs(&self) -> i64 {
        self.interval().duration_secs()
    }
}

/// Part of an interval that lies within a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlice {
    pub start_ts: i64,
    pub end_ts: i64,
    pub day_key: String,
}

impl DaySlice {
    pub fn duration_secs(&self) -> i64 {
        self.end_ts.saturating_sub(self.start_ts).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleTotal {
    pub category: String,
    pub title: String,
    pub seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotals {
    pub day_key: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub tracked_seconds: i64,
    pub by_category_seconds: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCoverage {
    pub card_id: i64,
    pub card_seconds: i64,
    pub covered_seconds: i64,
    pub fraction: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub tracked_non_system_seconds: i64,
    pub covered_seconds: i64,
    pub coverage_fraction: f64,
    pub focus_seconds: i64,
    pub neutral_seconds: i64,
    pub distracted_seconds: i64,
    pub unreviewed_card_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    pub longest_work_block_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub scope: TimeInterval,
    pub include_system: bool,
    pub window_seconds: i64,
    pub tracked_seconds: i64,
    pub untracked_seconds: i64,
    pub system_seconds: i64,
    pub card_count: usize,
    pub review_segment_count: usize,
    pub by_category_seconds: Vec<CategoryTotal>,
    pub by_title_seconds: Vec<TitleTotal>,
    pub per_day: Vec<DayTotals>,
    pub review: ReviewStats,
    pub blocks: BlockStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_parse_accepts_only_known_values() {
        assert_eq!(Rating::parse("focus"), Some(Rating::Focus));
        assert_eq!(Rating::parse(" neutral "), Some(Rating::Neutral));
        assert_eq!(Rating::parse("distracted"), Some(Rating::Distracted));
        assert_eq!(Rating::parse("Focus"), None);
        assert_eq!(Rating::parse("bored"), None);
    }

    #[test]
    fn raw_card_reads_camel_and_snake_case_keys() {
        let camel: RawCard = serde_json::from_str(
            r#"{"id": 7, "startTs": 10, "endTs": 20, "category": "Work", "title": "coding"}"#,
        )
        .unwrap();
        let snake: RawCard = serde_json::from_str(
            r#"{"id": 7, "start_ts": 10, "end_ts": 20, "category": "Work", "title": "coding"}"#,
        )
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel, RawCard::new(7, 10, 20, "Work", "coding"));
    }

    #[test]
    fn raw_card_tolerates_missing_fields() {
        let card: RawCard = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(card.id, Some(3.0));
        assert!(card.start_ts.is_none());
        assert!(card.title.is_none());
    }

    #[test]
    fn interval_duration_never_negative() {
        assert_eq!(TimeInterval::new(10, 25).duration_secs(), 15);
        assert_eq!(TimeInterval::new(25, 10).duration_secs(), 0);
        assert!(TimeInterval::new(5, 5).is_empty());
        assert_eq!(TimeInterval::new(i64::MIN, i64::MAX).duration_secs(), i64::MAX);
    }
}
