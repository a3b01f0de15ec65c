//! services/tracker/src/adapters/records.rs
//!
//! The persisted JSON shape of both collections and its conversion to and from
//! the domain types. Field names follow the documents the mobile app already
//! wrote, so existing data loads unchanged.

use chrono::{DateTime, SecondsFormat, Utc};
use reading_tracker_core::domain::{Book, ReadingEvent};
use reading_tracker_core::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};

/// Storage key of the books collection.
pub const BOOKS_KEY: &str = "livres_v2";
/// Storage key of the reading events collection.
pub const EVENTS_KEY: &str = "lectures_v2";

//=========================================================================================
// "Impure" Storage Record Structs
//=========================================================================================

#[derive(Debug, Serialize, Deserialize)]
struct BookRecord {
    id: String,
    titre: String,
    total: u32,
    lues: u64,
}

impl BookRecord {
    fn from_domain(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            titre: book.title.clone(),
            total: book.total_pages,
            lues: book.pages_read,
        }
    }

    fn to_domain(self) -> Book {
        Book {
            id: self.id,
            title: self.titre,
            total_pages: self.total,
            pages_read: self.lues,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    id: String,
    date: String,
    pages_lues: u32,
    #[serde(default)]
    livre_id: Option<String>,
}

impl EventRecord {
    fn from_domain(event: &ReadingEvent) -> Self {
        Self {
            id: event.id.clone(),
            date: event.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            pages_lues: event.pages,
            livre_id: event.book_id.clone(),
        }
    }

    /// Rejects timestamps that are not RFC 3339 so the engine never sees them.
    fn to_domain(self) -> PortResult<ReadingEvent> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map_err(|e| {
                PortError::InvalidRecord(format!(
                    "reading event {} has an invalid date '{}': {}",
                    self.id, self.date, e
                ))
            })?
            .with_timezone(&Utc);
        Ok(ReadingEvent {
            id: self.id,
            date,
            pages: self.pages_lues,
            book_id: self.livre_id,
        })
    }
}

//=========================================================================================
// Encoding Helpers
//=========================================================================================

pub fn encode_books(books: &[Book]) -> PortResult<String> {
    let records: Vec<BookRecord> = books.iter().map(BookRecord::from_domain).collect();
    serde_json::to_string(&records).map_err(|e| PortError::Unexpected(e.to_string()))
}

pub fn decode_books(json: &str) -> PortResult<Vec<Book>> {
    let records: Vec<BookRecord> = serde_json::from_str(json)
        .map_err(|e| PortError::InvalidRecord(format!("{}: {}", BOOKS_KEY, e)))?;
    Ok(records.into_iter().map(BookRecord::to_domain).collect())
}

pub fn encode_events(events: &[ReadingEvent]) -> PortResult<String> {
    let records: Vec<EventRecord> = events.iter().map(EventRecord::from_domain).collect();
    serde_json::to_string(&records).map_err(|e| PortError::Unexpected(e.to_string()))
}

pub fn decode_events(json: &str) -> PortResult<Vec<ReadingEvent>> {
    let records: Vec<EventRecord> = serde_json::from_str(json)
        .map_err(|e| PortError::InvalidRecord(format!("{}: {}", EVENTS_KEY, e)))?;
    records.into_iter().map(EventRecord::to_domain).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decodes_documents_written_by_the_app() {
        let books = decode_books(r#"[{"id":"1712345678901","titre":"Dune","total":412,"lues":37}]"#)
            .unwrap();
        assert_eq!(books[0].id, "1712345678901");
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].total_pages, 412);
        assert_eq!(books[0].pages_read, 37);

        let events = decode_events(
            r#"[{"id":"1712345679000","date":"2024-04-05T19:34:39.000Z","pagesLues":37,"livreId":"1712345678901"},
                {"id":"1712345679999","date":"2024-04-06T07:00:00.000Z","pagesLues":5,"livreId":null}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].date,
            Utc.with_ymd_and_hms(2024, 4, 5, 19, 34, 39).unwrap()
        );
        assert_eq!(events[0].book_id.as_deref(), Some("1712345678901"));
        assert_eq!(events[1].book_id, None);
    }

    #[test]
    fn test_encodes_iso_timestamps() {
        let event = ReadingEvent {
            id: "e1".to_string(),
            date: Utc.with_ymd_and_hms(2024, 4, 5, 19, 34, 39).unwrap(),
            pages: 12,
            book_id: None,
        };
        let json = encode_events(&[event]).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"e1","date":"2024-04-05T19:34:39.000Z","pagesLues":12,"livreId":null}]"#
        );
    }

    #[test]
    fn test_rejects_malformed_dates() {
        let err = decode_events(r#"[{"id":"x","date":"yesterday","pagesLues":3,"livreId":null}]"#)
            .unwrap_err();
        assert!(matches!(err, PortError::InvalidRecord(msg) if msg.contains("yesterday")));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            decode_books("{not json"),
            Err(PortError::InvalidRecord(_))
        ));
    }
}
