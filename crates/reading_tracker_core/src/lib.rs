pub mod domain;
pub mod library;
pub mod ports;
pub mod stats;
pub mod validation;

pub use domain::{Book, DailyPages, ReadingEvent, ReadingStats, StreakSnapshot};
pub use library::{IntegrityReport, Library, LibraryError, PagesDrift};
pub use ports::{Clock, PortError, PortResult, ReadingStore};
pub use stats::{
    book_progress, compute_stats, compute_streak, compute_today_pages, compute_weekly_series,
    compute_weekly_series_with, recompute_book_pages, weekly_chart_scale, DayLabeler,
    EnglishWeekday, FrenchWeekday,
};
pub use validation::ValidationError;
