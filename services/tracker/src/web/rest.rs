//! services/tracker/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::TrackerError;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, NaiveDate, Utc};
use reading_tracker_core::domain::{Book, DailyPages, ReadingEvent, ReadingStats};
use reading_tracker_core::library::LibraryError;
use reading_tracker_core::stats::book_progress;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books_handler,
        create_book_handler,
        delete_book_handler,
        list_events_handler,
        create_event_handler,
        stats_handler,
    ),
    components(
        schemas(
            BookResponse, BookListResponse, CreateBookRequest,
            EventResponse, EventListResponse, CreateEventRequest,
            StatsResponse, StreakResponse, DayResponse,
        )
    ),
    tags(
        (name = "Reading Tracker API", description = "Books, reading sessions and reading statistics.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub total_pages: u32,
    pub pages_read: u64,
    /// Fraction read, between 0 and 1.
    pub progress: f64,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            total_pages: book.total_pages,
            pages_read: book.pages_read,
            progress: book_progress(book),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookListResponse {
    pub books: Vec<BookResponse>,
    pub load_errors: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub title: String,
    pub total_pages: i64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub date: DateTime<Utc>,
    pub pages: u32,
    pub book_id: Option<String>,
}

impl From<&ReadingEvent> for EventResponse {
    fn from(event: &ReadingEvent) -> Self {
        Self {
            id: event.id.clone(),
            date: event.date,
            pages: event.pages,
            book_id: event.book_id.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
    pub load_errors: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub pages: i64,
    #[serde(default)]
    pub book_id: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub last_reading_date: Option<NaiveDate>,
    pub is_streak_active_today: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub label: String,
    pub pages: u64,
}

impl From<DailyPages> for DayResponse {
    fn from(day: DailyPages) -> Self {
        Self {
            date: day.date,
            label: day.label,
            pages: day.pages,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub today_pages: u64,
    pub streak: StreakResponse,
    pub weekly: Vec<DayResponse>,
    pub chart_scale: u64,
    pub total_sessions: usize,
    pub total_pages: u64,
    pub load_errors: Vec<String>,
}

impl StatsResponse {
    fn new(stats: ReadingStats, load_errors: Vec<String>) -> Self {
        Self {
            today_pages: stats.today_pages,
            streak: StreakResponse {
                current_streak: stats.streak.current_streak,
                last_reading_date: stats.streak.last_reading_date,
                is_streak_active_today: stats.streak.is_streak_active_today,
            },
            weekly: stats.weekly.into_iter().map(DayResponse::from).collect(),
            chart_scale: stats.chart_scale,
            total_sessions: stats.total_sessions,
            total_pages: stats.total_pages,
            load_errors,
        }
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

fn error_response(context: &str, e: TrackerError) -> (StatusCode, String) {
    let status = match &e {
        TrackerError::Library(LibraryError::UnknownBook(_)) => StatusCode::NOT_FOUND,
        TrackerError::Library(LibraryError::Validation(_)) => StatusCode::BAD_REQUEST,
        TrackerError::LoadFailed { .. } | TrackerError::SaveFailed { .. } => {
            error!("{}: {}", context, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}

fn messages(errors: Vec<TrackerError>) -> Vec<String> {
    errors.into_iter().map(|e| e.to_string()).collect()
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List all books with their reading progress.
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "Current books", body = BookListResponse)
    )
)]
pub async fn list_books_handler(State(app_state): State<Arc<AppState>>) -> Json<BookListResponse> {
    let refreshed = app_state.tracker.refresh().await;
    Json(BookListResponse {
        books: refreshed.value.books().iter().map(BookResponse::from).collect(),
        load_errors: messages(refreshed.load_errors),
    })
}

/// Add a book to the library.
#[utoipa::path(
    post,
    path = "/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Blank title or non-positive page count"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_book_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let book = app_state
        .tracker
        .create_book(&req.title, req.total_pages)
        .await
        .map_err(|e| error_response("Failed to create book", e))?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(&book))))
}

/// Delete a book and every reading session logged against it.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(
        ("id" = String, Path, description = "The book identifier.")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "No such book"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_book_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    app_state
        .tracker
        .delete_book(&id)
        .await
        .map_err(|e| error_response("Failed to delete book", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all reading sessions.
#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "Logged reading sessions", body = EventListResponse)
    )
)]
pub async fn list_events_handler(State(app_state): State<Arc<AppState>>) -> Json<EventListResponse> {
    let refreshed = app_state.tracker.refresh().await;
    Json(EventListResponse {
        events: refreshed.value.events().iter().map(EventResponse::from).collect(),
        load_errors: messages(refreshed.load_errors),
    })
}

/// Log a reading session, optionally against a book.
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Session logged", body = EventResponse),
        (status = 400, description = "Non-positive page count"),
        (status = 404, description = "Unknown book"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_event_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let event = app_state
        .tracker
        .add_event(req.pages, req.book_id)
        .await
        .map_err(|e| error_response("Failed to log reading session", e))?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(&event))))
}

/// Today's pages, the current streak and the last seven days.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Freshly computed statistics", body = StatsResponse)
    )
)]
pub async fn stats_handler(State(app_state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let refreshed = app_state.tracker.stats().await;
    Json(StatsResponse::new(refreshed.value, messages(refreshed.load_errors)))
}
