//! services/tracker/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::{Config, DayLabels};
use crate::tracker::ReadingTracker;
use reading_tracker_core::ports::{Clock, ReadingStore};
use reading_tracker_core::stats::{DayLabeler, EnglishWeekday, FrenchWeekday};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<ReadingTracker>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the tracker to the given store and clock, with labels chosen by config.
    pub fn new(config: Arc<Config>, store: Arc<dyn ReadingStore>, clock: Arc<dyn Clock>) -> Self {
        let labeler: Arc<dyn DayLabeler> = match config.day_labels {
            DayLabels::French => Arc::new(FrenchWeekday),
            DayLabels::English => Arc::new(EnglishWeekday),
        };
        Self {
            tracker: Arc::new(ReadingTracker::new(store, clock, labeler)),
            config,
        }
    }
}
