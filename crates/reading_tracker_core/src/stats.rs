//! crates/reading_tracker_core/src/stats.rs
//!
//! The statistics engine: pure functions that turn reading events into
//! day-level aggregates and a streak value.
//!
//! Every function takes the reference instant explicitly. An event's calendar
//! day is its instant seen in the reference instant's time zone, with the time
//! of day discarded.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};

use crate::domain::{Book, DailyPages, ReadingEvent, ReadingStats, StreakSnapshot};

/// Number of entries in the weekly series.
pub const WEEK_DAYS: u64 = 7;

/// Lowest value the weekly chart scale may take.
pub const MIN_CHART_SCALE: u64 = 10;

//=========================================================================================
// Day Labels
//=========================================================================================

/// Formats the short label shown under each bar of the weekly chart.
pub trait DayLabeler: Send + Sync {
    fn label(&self, date: NaiveDate) -> String;
}

/// Upper-case French short weekday names without the trailing dot ("LUN", "MAR", ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct FrenchWeekday;

impl DayLabeler for FrenchWeekday {
    fn label(&self, date: NaiveDate) -> String {
        let name = match date.weekday() {
            Weekday::Mon => "LUN",
            Weekday::Tue => "MAR",
            Weekday::Wed => "MER",
            Weekday::Thu => "JEU",
            Weekday::Fri => "VEN",
            Weekday::Sat => "SAM",
            Weekday::Sun => "DIM",
        };
        name.to_string()
    }
}

/// Upper-case English short weekday names ("MON", "TUE", ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishWeekday;

impl DayLabeler for EnglishWeekday {
    fn label(&self, date: NaiveDate) -> String {
        date.weekday().to_string().to_uppercase()
    }
}

//=========================================================================================
// Engine Operations
//=========================================================================================

fn calendar_day<Tz: TimeZone>(instant: &DateTime<Utc>, zone: &Tz) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}

fn pages_on<Tz: TimeZone>(events: &[ReadingEvent], day: NaiveDate, zone: &Tz) -> u64 {
    events
        .iter()
        .filter(|event| calendar_day(&event.date, zone) == day)
        .map(|event| u64::from(event.pages))
        .sum()
}

/// Total pages read on the reference instant's calendar day.
pub fn compute_today_pages<Tz: TimeZone>(events: &[ReadingEvent], now: &DateTime<Tz>) -> u64 {
    pages_on(events, now.date_naive(), &now.timezone())
}

/// The current run of consecutive reading days.
///
/// When the most recent reading day is two or more days before today the
/// streak is reported as broken (0), even though `last_reading_date` is still
/// filled in. A run that ended yesterday still counts.
pub fn compute_streak<Tz: TimeZone>(events: &[ReadingEvent], now: &DateTime<Tz>) -> StreakSnapshot {
    let zone = now.timezone();
    let days: BTreeSet<NaiveDate> = events
        .iter()
        .map(|event| calendar_day(&event.date, &zone))
        .collect();

    let mut newest_first = days.into_iter().rev();
    let Some(most_recent) = newest_first.next() else {
        return StreakSnapshot::default();
    };

    let day_gap = now.date_naive().signed_duration_since(most_recent).num_days();
    if day_gap > 1 {
        return StreakSnapshot {
            current_streak: 0,
            last_reading_date: Some(most_recent),
            is_streak_active_today: false,
        };
    }

    let mut streak = 1;
    let mut expected = most_recent.pred_opt();
    for day in newest_first {
        if Some(day) != expected {
            break;
        }
        streak += 1;
        expected = day.pred_opt();
    }

    StreakSnapshot {
        current_streak: streak,
        last_reading_date: Some(most_recent),
        is_streak_active_today: day_gap == 0,
    }
}

/// Seven daily page totals, oldest first, ending on the reference instant's day.
pub fn compute_weekly_series<Tz: TimeZone>(
    events: &[ReadingEvent],
    now: &DateTime<Tz>,
) -> Vec<DailyPages> {
    compute_weekly_series_with(events, now, &FrenchWeekday)
}

/// Same as [`compute_weekly_series`] with an explicit label format.
pub fn compute_weekly_series_with<Tz, L>(
    events: &[ReadingEvent],
    now: &DateTime<Tz>,
    labeler: &L,
) -> Vec<DailyPages>
where
    Tz: TimeZone,
    L: DayLabeler + ?Sized,
{
    let zone = now.timezone();
    let today = now.date_naive();

    (0..WEEK_DAYS)
        .rev()
        .map(|offset| {
            let date = today
                .checked_sub_days(Days::new(offset))
                .unwrap_or(NaiveDate::MIN);
            DailyPages {
                date,
                label: labeler.label(date),
                pages: pages_on(events, date, &zone),
            }
        })
        .collect()
}

/// Ground-truth page count for a book, summed from its events.
pub fn recompute_book_pages(events: &[ReadingEvent], book_id: &str) -> u64 {
    events
        .iter()
        .filter(|event| event.references(book_id))
        .map(|event| u64::from(event.pages))
        .sum()
}

/// Largest daily value of the series, never below [`MIN_CHART_SCALE`].
pub fn weekly_chart_scale(series: &[DailyPages]) -> u64 {
    series
        .iter()
        .map(|day| day.pages)
        .max()
        .unwrap_or(0)
        .max(MIN_CHART_SCALE)
}

/// Fraction of the book already read, clamped to `[0, 1]`.
pub fn book_progress(book: &Book) -> f64 {
    if book.total_pages == 0 {
        return 0.0;
    }
    (book.pages_read as f64 / f64::from(book.total_pages)).clamp(0.0, 1.0)
}

/// Computes every figure of the statistics screen from the same inputs.
pub fn compute_stats<Tz, L>(events: &[ReadingEvent], now: &DateTime<Tz>, labeler: &L) -> ReadingStats
where
    Tz: TimeZone,
    L: DayLabeler + ?Sized,
{
    let weekly = compute_weekly_series_with(events, now, labeler);
    ReadingStats {
        today_pages: compute_today_pages(events, now),
        streak: compute_streak(events, now),
        chart_scale: weekly_chart_scale(&weekly),
        weekly,
        total_sessions: events.len(),
        total_pages: events.iter().map(|event| u64::from(event.pages)).sum(),
    }
}
