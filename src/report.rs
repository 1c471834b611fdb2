use std::fmt::Write;

use crate::models::{DashboardStats, Rating};

const REPORT_TOP_ROWS: usize = 10;

pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m {:02}s", seconds % 60)
    }
}

pub fn build_report(stats: &DashboardStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Time Usage Report");
    let _ = writeln!(
        output,
        "Window {}..{} ({}), System cards {}",
        stats.scope.start_ts,
        stats.scope.end_ts,
        format_duration(stats.window_seconds),
        if stats.include_system { "included" } else { "excluded" }
    );
    let _ = writeln!(
        output,
        "Tracked {} / untracked {} across {} cards",
        format_duration(stats.tracked_seconds),
        format_duration(stats.untracked_seconds),
        stats.card_count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Categories");

    if stats.by_category_seconds.is_empty() {
        let _ = writeln!(output, "No tracked time in this window.");
    } else {
        for total in stats.by_category_seconds.iter().take(REPORT_TOP_ROWS) {
            let _ = writeln!(
                output,
                "- {}: {}",
                total.category,
                format_duration(total.seconds)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Titles");

    if stats.by_title_seconds.is_empty() {
        let _ = writeln!(output, "No tracked time in this window.");
    } else {
        for total in stats.by_title_seconds.iter().take(REPORT_TOP_ROWS) {
            let _ = writeln!(
                output,
                "- {} ({}): {}",
                total.title,
                total.category,
                format_duration(total.seconds)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Days");
    for day in &stats.per_day {
        let _ = writeln!(
            output,
            "- {}: {}",
            day.day_key,
            format_duration(day.tracked_seconds)
        );
    }

    let review = &stats.review;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Review");
    let _ = writeln!(
        output,
        "- Coverage {:.0}% of {}",
        review.coverage_fraction * 100.0,
        format_duration(review.tracked_non_system_seconds)
    );
    for (rating, seconds) in [
        (Rating::Focus, review.focus_seconds),
        (Rating::Neutral, review.neutral_seconds),
        (Rating::Distracted, review.distracted_seconds),
    ] {
        let _ = writeln!(output, "- {}: {}", rating.as_str(), format_duration(seconds));
    }
    let _ = writeln!(output, "- Unreviewed cards: {}", review.unreviewed_card_count);
    let _ = writeln!(
        output,
        "- Longest block: {}",
        format_duration(stats.blocks.longest_work_block_seconds)
    );

    output
}
