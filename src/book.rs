use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog classification for a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum BookCategory {
    /// Novels and other fiction
    Fiction,
    /// Non-fiction works
    NonFiction,
    /// Reference works that normally stay in the reading room
    Reference,
}

/// Loan status of a catalog item.
///
/// The borrow timestamp lives inside the `OnLoan` variant, so a book can
/// never be marked available while still carrying a borrow date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum BookStatus {
    /// Book is on the shelf and may be borrowed
    #[default]
    Available,
    /// Book is held by exactly one user
    OnLoan {
        /// When the current loan started
        borrowed_at: DateTime<Utc>,
    },
}

/// A catalog item. The title doubles as the catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Title, unique within a library's catalog
    pub title: String,
    /// Author name
    pub author: String,
    /// Catalog classification
    pub category: BookCategory,
    /// Current loan status; flipped only by the library's loan operations
    status: BookStatus,
}

impl Book {
    /// Create a new book, initially available
    #[must_use]
    pub fn new(title: &str, author: &str, category: BookCategory) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            category,
            status: BookStatus::Available,
        }
    }

    /// Whether the book is currently on the shelf
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self.status, BookStatus::Available)
    }

    /// Start of the current loan, if the book is out
    #[must_use]
    pub fn borrowed_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            BookStatus::Available => None,
            BookStatus::OnLoan { borrowed_at } => Some(borrowed_at),
        }
    }

    /// Current loan status
    #[must_use]
    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// Mark the book as lent out since `borrowed_at`
    pub(crate) fn check_out(&mut self, borrowed_at: DateTime<Utc>) {
        self.status = BookStatus::OnLoan { borrowed_at };
    }

    /// Put the book back on the shelf
    pub(crate) fn check_in(&mut self) {
        self.status = BookStatus::Available;
    }
}
