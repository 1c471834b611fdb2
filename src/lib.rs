pub mod aggregate;
pub mod attribution;
pub mod calendar;
pub mod error;
pub mod input;
pub mod interval;
pub mod models;
pub mod report;
pub mod review;
pub mod stats;

pub use calendar::{DayCalendar, FixedOffsetCalendar, LocalCalendar};
pub use error::{InputError, StatsError};
pub use models::{DashboardStats, RawCard, RawReviewSegment, TimeInterval};
pub use stats::{compute_stats, StatsOptions};
