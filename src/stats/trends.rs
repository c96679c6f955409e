use serde::Serialize;
use time::{Date, Duration, Month, OffsetDateTime, Weekday};

/// Named time window selector for the trend dashboard. Unrecognized
/// values fall back to `Month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendRange {
    Today,
    Week,
    LastWeek,
    Month,
}

impl TrendRange {
    pub fn parse(value: Option<&str>) -> TrendRange {
        match value {
            Some("today") => TrendRange::Today,
            Some("week") => TrendRange::Week,
            Some("lastWeek") => TrendRange::LastWeek,
            _ => TrendRange::Month,
        }
    }
}

/// One discrete slot in a trend series: an hour of the day or a
/// calendar day, with its display label and count.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Serialize)]
pub struct TrendSeries {
    pub data: Vec<TrendBucket>,
    pub range: TrendRange,
}

fn monday_of(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

fn previous_month(date: Date) -> (i32, Month) {
    match date.month() {
        Month::January => (date.year() - 1, Month::December),
        month => (date.year(), month.previous()),
    }
}

fn days_in_month(year: i32, month: Month) -> u8 {
    let first = Date::from_calendar_date(year, month, 1).expect("first of month");
    let next = match month {
        Month::December => Date::from_calendar_date(year + 1, Month::January, 1),
        _ => Date::from_calendar_date(year, month.next(), 1),
    }
    .expect("first of month");
    (next - first).whole_days() as u8
}

/// Counts creation timestamps into the bucket sequence of `range`,
/// evaluated at `now`. Every bucket of the window is emitted, zero or
/// not, in chronological order; timestamps outside the window are
/// ignored. All calendar math uses the offset the timestamps carry,
/// with weeks starting on Monday.
pub fn compute_trend(
    range: TrendRange,
    now: OffsetDateTime,
    created_at: &[OffsetDateTime],
) -> TrendSeries {
    let count_day = |date: Date| created_at.iter().filter(|t| t.date() == date).count();

    let data = match range {
        TrendRange::Today => {
            let today = now.date();
            (0u8..24)
                .map(|hour| TrendBucket {
                    label: format!("{hour:02}:00"),
                    value: created_at
                        .iter()
                        .filter(|t| t.date() == today && t.hour() == hour)
                        .count(),
                })
                .collect()
        }
        TrendRange::Week | TrendRange::LastWeek => {
            let mut monday = monday_of(now.date());
            if range == TrendRange::LastWeek {
                monday -= Duration::days(7);
            }
            (0..7)
                .map(|offset| {
                    let day = monday + Duration::days(offset);
                    TrendBucket {
                        label: weekday_label(day.weekday()).to_string(),
                        value: count_day(day),
                    }
                })
                .collect()
        }
        TrendRange::Month => {
            // The entire previous calendar month, whatever today is.
            let (year, month) = previous_month(now.date());
            (1..=days_in_month(year, month))
                .map(|day| {
                    let date =
                        Date::from_calendar_date(year, month, day).expect("day within month");
                    TrendBucket {
                        label: day.to_string(),
                        value: count_day(date),
                    }
                })
                .collect()
        }
    };

    TrendSeries { data, range }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn unrecognized_range_defaults_to_month() {
        assert_eq!(TrendRange::parse(None), TrendRange::Month);
        assert_eq!(TrendRange::parse(Some("fortnight")), TrendRange::Month);
        assert_eq!(TrendRange::parse(Some("lastWeek")), TrendRange::LastWeek);
        assert_eq!(TrendRange::parse(Some("today")), TrendRange::Today);
    }

    #[test]
    fn today_always_has_24_hour_buckets() {
        let now = datetime!(2025-03-12 10:30 UTC);
        let created = [
            datetime!(2025-03-12 00:00 UTC),
            datetime!(2025-03-12 09:15 UTC),
            datetime!(2025-03-12 09:59 UTC),
            datetime!(2025-03-12 23:59:59 UTC),
            datetime!(2025-03-11 09:15 UTC), // yesterday, out of window
        ];
        let series = compute_trend(TrendRange::Today, now, &created);

        assert_eq!(series.data.len(), 24);
        assert_eq!(series.data[0].label, "00:00");
        assert_eq!(series.data[23].label, "23:00");
        assert_eq!(series.data[0].value, 1);
        assert_eq!(series.data[9].value, 2);
        assert_eq!(series.data[23].value, 1);
        let total: usize = series.data.iter().map(|b| b.value).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn week_runs_monday_to_sunday_around_now() {
        // 2025-03-12 is a Wednesday; its week is 03-10 through 03-16.
        let now = datetime!(2025-03-12 12:00 UTC);
        let created = [
            datetime!(2025-03-10 00:00 UTC),     // Monday boundary
            datetime!(2025-03-16 23:59:59 UTC),  // Sunday boundary
            datetime!(2025-03-12 08:00 UTC),
            datetime!(2025-03-09 23:59:59 UTC),  // previous Sunday, out
            datetime!(2025-03-17 00:00 UTC),     // next Monday, out
        ];
        let series = compute_trend(TrendRange::Week, now, &created);

        let labels: Vec<&str> = series.data.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(series.data[0].value, 1);
        assert_eq!(series.data[2].value, 1);
        assert_eq!(series.data[6].value, 1);
        let total: usize = series.data.iter().map(|b| b.value).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn sunday_still_belongs_to_the_week_that_started_six_days_earlier() {
        let sunday = datetime!(2025-03-16 08:00 UTC);
        let created = [datetime!(2025-03-10 12:00 UTC)];
        let series = compute_trend(TrendRange::Week, sunday, &created);
        // Monday 03-10 is in the window, so the count lands in bucket 0.
        assert_eq!(series.data[0].value, 1);
    }

    #[test]
    fn last_week_shifts_one_full_week_back() {
        let now = datetime!(2025-03-12 12:00 UTC);
        let created = [
            datetime!(2025-03-03 00:00 UTC), // last Monday
            datetime!(2025-03-09 12:00 UTC), // last Sunday
            datetime!(2025-03-10 12:00 UTC), // this week, out
        ];
        let series = compute_trend(TrendRange::LastWeek, now, &created);
        assert_eq!(series.data.len(), 7);
        assert_eq!(series.data[0].value, 1);
        assert_eq!(series.data[6].value, 1);
        let total: usize = series.data.iter().map(|b| b.value).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn month_covers_the_whole_previous_calendar_month() {
        // Evaluated mid-March 2024: the window is February 2024 (leap).
        let now = datetime!(2024-03-15 12:00 UTC);
        let created = [
            datetime!(2024-02-01 00:00 UTC),
            datetime!(2024-02-29 23:59 UTC),
            datetime!(2024-03-01 00:00 UTC), // current month, out
            datetime!(2024-01-31 12:00 UTC), // two months back, out
        ];
        let series = compute_trend(TrendRange::Month, now, &created);

        assert_eq!(series.data.len(), 29);
        assert_eq!(series.data[0].label, "1");
        assert_eq!(series.data[28].label, "29");
        assert_eq!(series.data[0].value, 1);
        assert_eq!(series.data[28].value, 1);
        let total: usize = series.data.iter().map(|b| b.value).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn january_rolls_back_to_december_of_the_previous_year() {
        let now = datetime!(2025-01-05 12:00 UTC);
        let created = [datetime!(2024-12-31 10:00 UTC)];
        let series = compute_trend(TrendRange::Month, now, &created);
        assert_eq!(series.data.len(), 31);
        assert_eq!(series.data[30].value, 1);
    }

    #[test]
    fn empty_buckets_are_emitted_with_zero_values() {
        let now = datetime!(2025-03-12 12:00 UTC);
        let series = compute_trend(TrendRange::Week, now, &[]);
        assert_eq!(series.data.len(), 7);
        assert!(series.data.iter().all(|b| b.value == 0));
    }
}
