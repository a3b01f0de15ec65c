//! crates/reading_tracker_core/src/validation.rs
//!
//! Checks applied to user input before it reaches the library.

/// Why a book or reading session was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("A book needs a non-empty title")]
    EmptyTitle,
    #[error("A book needs a positive page count, got {0}")]
    InvalidTotalPages(i64),
    #[error("A reading session needs a positive page count, got {0}")]
    InvalidSessionPages(i64),
}

/// Returns the title, exactly as typed, and page count of a valid new book.
/// Surrounding whitespace only matters for the emptiness check.
pub fn validate_new_book(title: &str, total_pages: i64) -> Result<(String, u32), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let total = positive_pages(total_pages).ok_or(ValidationError::InvalidTotalPages(total_pages))?;
    Ok((title.to_string(), total))
}

/// Returns the page count of a valid reading session.
pub fn validate_session_pages(pages: i64) -> Result<u32, ValidationError> {
    positive_pages(pages).ok_or(ValidationError::InvalidSessionPages(pages))
}

fn positive_pages(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|pages| *pages > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_title_is_kept_as_typed() {
        assert_eq!(
            validate_new_book("  Dune ", 412),
            Ok(("  Dune ".to_string(), 412))
        );
    }

    #[test]
    fn test_book_rejects_blank_title_and_bad_totals() {
        assert_eq!(validate_new_book("   ", 10), Err(ValidationError::EmptyTitle));
        assert_eq!(
            validate_new_book("Dune", 0),
            Err(ValidationError::InvalidTotalPages(0))
        );
        assert_eq!(
            validate_new_book("Dune", -3),
            Err(ValidationError::InvalidTotalPages(-3))
        );
    }

    #[test]
    fn test_session_pages() {
        assert_eq!(validate_session_pages(25), Ok(25));
        assert_eq!(
            validate_session_pages(0),
            Err(ValidationError::InvalidSessionPages(0))
        );
        assert_eq!(
            validate_session_pages(i64::from(u32::MAX) + 1),
            Err(ValidationError::InvalidSessionPages(i64::from(u32::MAX) + 1))
        );
    }
}
