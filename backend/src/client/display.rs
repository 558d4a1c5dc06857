//! Presentation helpers for the confession list and the form counter.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::DEFAULT_CATEGORY;
use crate::wire::ListedConfession;

/// Visual state of the character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCountLevel {
    /// Up to 600 characters.
    Normal,
    /// 601 to 800 characters.
    Warning,
    /// More than 800 characters.
    Limit,
}

impl CharCountLevel {
    const WARNING_ABOVE: usize = 600;
    const LIMIT_ABOVE: usize = 800;

    /// Level for a draft of `chars` characters.
    pub fn for_length(chars: usize) -> Self {
        if chars > Self::LIMIT_ABOVE {
            Self::Limit
        } else if chars > Self::WARNING_ABOVE {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Level for `text`, counting Unicode scalar values.
    pub fn for_text(text: &str) -> Self {
        Self::for_length(text.chars().count())
    }
}

/// Relative age of `created_at` as seen at `now`. Entries a week or older
/// show their calendar date in the time zone of `now`.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use confessions::client::time_ago;
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid");
/// assert_eq!(time_ago(now - TimeDelta::seconds(30), &now), "just now");
/// assert_eq!(time_ago(now - TimeDelta::minutes(5), &now), "5m ago");
/// assert_eq!(time_ago(now - TimeDelta::days(10), &now), "5/22/2025");
/// ```
pub fn time_ago<Tz>(created_at: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let age = now.with_timezone(&Utc) - created_at;
    let minutes = age.num_minutes();
    let hours = age.num_hours();
    let days = age.num_days();

    if age.num_seconds() < 60 {
        "just now".to_owned()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        created_at
            .with_timezone(&now.timezone())
            .format("%-m/%-d/%Y")
            .to_string()
    }
}

/// Public number shown for a confession: the segment after the first `_`.
pub fn display_number(confession_id: &str) -> Option<&str> {
    confession_id
        .split('_')
        .nth(1)
        .filter(|segment| !segment.is_empty())
}

/// Badge label for `category`; the default category gets none.
pub fn category_badge(category: &str) -> Option<&str> {
    let trimmed = category.trim();
    (!trimmed.is_empty() && trimmed != DEFAULT_CATEGORY).then_some(trimmed)
}

/// Counters shown above the public list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfessionStats {
    /// Confessions currently listed.
    pub total: usize,
    /// Listed confessions created on the same calendar day as `now`.
    pub today: usize,
}

impl ConfessionStats {
    /// Count `confessions`, judging "today" in the time zone of `now`.
    pub fn collect<Tz: TimeZone>(confessions: &[ListedConfession], now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let zone = now.timezone();
        Self {
            total: confessions.len(),
            today: confessions
                .iter()
                .filter(|entry| entry.timestamp.with_timezone(&zone).date_naive() == today)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeDelta};
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn body(timestamp: DateTime<Utc>) -> ListedConfession {
        ListedConfession {
            id: "confession_1748779200000_abc123xyz".to_owned(),
            confession: "It was me who ate the cake".to_owned(),
            category: DEFAULT_CATEGORY.to_owned(),
            recipient: "B Kosal".to_owned(),
            timestamp,
        }
    }

    #[rstest]
    #[case(0, CharCountLevel::Normal)]
    #[case(600, CharCountLevel::Normal)]
    #[case(601, CharCountLevel::Warning)]
    #[case(800, CharCountLevel::Warning)]
    #[case(801, CharCountLevel::Limit)]
    fn counter_levels_follow_thresholds(#[case] chars: usize, #[case] expected: CharCountLevel) {
        assert_eq!(CharCountLevel::for_length(chars), expected);
    }

    #[rstest]
    fn counter_counts_characters_not_bytes() {
        let text = "é".repeat(601);
        assert_eq!(text.len(), 1202);
        assert_eq!(CharCountLevel::for_text(&text), CharCountLevel::Warning);
    }

    #[rstest]
    #[case(TimeDelta::seconds(0), "just now")]
    #[case(TimeDelta::seconds(59), "just now")]
    #[case(TimeDelta::seconds(60), "1m ago")]
    #[case(TimeDelta::minutes(59), "59m ago")]
    #[case(TimeDelta::minutes(60), "1h ago")]
    #[case(TimeDelta::hours(23), "23h ago")]
    #[case(TimeDelta::hours(24), "1d ago")]
    #[case(TimeDelta::days(6), "6d ago")]
    #[case(TimeDelta::days(7), "5/25/2025")]
    fn relative_time_labels(now: DateTime<Utc>, #[case] age: TimeDelta, #[case] expected: &str) {
        assert_eq!(time_ago(now - age, &now), expected);
    }

    #[rstest]
    fn old_entries_show_the_date_in_the_callers_time_zone(now: DateTime<Utc>) {
        let created_at = now - TimeDelta::days(7) - TimeDelta::hours(13);
        let tokyo = FixedOffset::east_opt(9 * 3600).expect("valid offset");

        assert_eq!(time_ago(created_at, &now), "5/24/2025");
        assert_eq!(time_ago(created_at, &now.with_timezone(&tokyo)), "5/25/2025");
    }

    #[rstest]
    #[case("confession_1748779200000_abc123xyz", Some("1748779200000"))]
    #[case("confession_42", Some("42"))]
    #[case("legacy", None)]
    #[case("confession__x", None)]
    fn display_number_is_second_segment(#[case] id: &str, #[case] expected: Option<&str>) {
        assert_eq!(display_number(id), expected);
    }

    #[rstest]
    #[case("work", Some("work"))]
    #[case("uncategorized", None)]
    #[case("  ", None)]
    fn badges_skip_the_default_category(#[case] category: &str, #[case] expected: Option<&str>) {
        assert_eq!(category_badge(category), expected);
    }

    #[rstest]
    fn stats_count_same_day_entries(now: DateTime<Utc>) {
        let listed = [
            body(now - TimeDelta::hours(1)),
            body(now - TimeDelta::hours(11)),
            body(now - TimeDelta::hours(13)),
        ];

        let stats = ConfessionStats::collect(&listed, &now);

        assert_eq!(stats, ConfessionStats { total: 3, today: 2 });
    }

    #[rstest]
    fn stats_use_the_callers_time_zone(now: DateTime<Utc>) {
        let listed = [body(now - TimeDelta::hours(13))];
        let tokyo = FixedOffset::east_opt(9 * 3600).expect("valid offset");

        assert_eq!(ConfessionStats::collect(&listed, &now).today, 0);
        assert_eq!(
            ConfessionStats::collect(&listed, &now.with_timezone(&tokyo)).today,
            1
        );
    }
}
