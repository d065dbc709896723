use std::collections::HashMap;
use std::fmt;

use chrono::Utc;

use crate::{
    book::Book, fine::FineManager, logger::EventLogger, membership, user::User,
};

/// Domain refusals surfaced by library operations.
///
/// Every variant is also reported as a line through the injected logger.
/// None of them aborts the process, and a refused operation leaves the
/// library unchanged, with one documented exception: an inconsistent loan
/// is detected but left as it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    /// A catalog entry with this title already exists
    DuplicateTitle {
        /// Title that collided
        title: String,
    },
    /// A user with this id is already registered
    DuplicateUser {
        /// Id that collided
        id: String,
    },
    /// No catalog entry with this title
    BookNotFound {
        /// Title that was looked up
        title: String,
    },
    /// No registered user with this id
    UserNotFound {
        /// Id that was looked up
        id: String,
    },
    /// The book is already out on loan
    BookUnavailable {
        /// Title of the book
        title: String,
    },
    /// The book is already on the shelf
    AlreadyAvailable {
        /// Title of the book
        title: String,
    },
    /// The user's membership does not allow another concurrent loan
    BorrowLimitReached {
        /// Id of the refused user
        id: String,
    },
    /// The book is flagged as on loan but no holder is recorded
    InconsistentLoanState {
        /// Title of the affected book
        title: String,
    },
}

impl std::error::Error for LendingError {}

impl fmt::Display for LendingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTitle { title } => {
                write!(f, "A book titled \"{title}\" is already in the catalog")
            }
            Self::DuplicateUser { id } => {
                write!(f, "A user with id {id} is already registered")
            }
            Self::BookNotFound { title } => {
                write!(f, "No book titled \"{title}\" in the catalog")
            }
            Self::UserNotFound { id } => write!(f, "No registered user with id {id}"),
            Self::BookUnavailable { title } => {
                write!(f, "\"{title}\" is not available for loan right now")
            }
            Self::AlreadyAvailable { title } => {
                write!(f, "\"{title}\" is already available in the library")
            }
            Self::BorrowLimitReached { id } => {
                write!(f, "User {id} has reached the borrow limit of their membership")
            }
            Self::InconsistentLoanState { title } => {
                write!(f, "\"{title}\" is on loan but no holder is recorded")
            }
        }
    }
}

/// Orchestrates the catalog, active loans, fines and event logging.
///
/// Books move between two states, Available and `OnLoan`, and a title sits
/// in the active-loans map exactly while its book is out. All operations
/// are synchronous in-memory mutations; callers wanting to share a library
/// across threads must wrap the whole thing in their own lock.
pub struct Library {
    /// Catalog, keyed by title
    catalog: HashMap<String, Book>,
    /// Holder of each book currently out, keyed by title
    active_loans: HashMap<String, String>,
    /// Registered users, keyed by id
    users: HashMap<String, User>,
    /// Late-fee calculator consulted on every return
    fine_manager: FineManager,
    /// Injected sink for event lines
    logger: Box<dyn EventLogger>,
}

// Manual implementation of Debug because the logger is a trait object
impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("catalog", &self.catalog)
            .field("active_loans", &self.active_loans)
            .field("users", &self.users)
            .field("fine_manager", &self.fine_manager)
            .finish_non_exhaustive()
    }
}

impl Library {
    /// Create an empty library reporting to `logger` and pricing overdue
    /// returns with `fine_manager`
    #[must_use]
    pub fn new(logger: Box<dyn EventLogger>, fine_manager: FineManager) -> Self {
        Self {
            catalog: HashMap::new(),
            active_loans: HashMap::new(),
            users: HashMap::new(),
            fine_manager,
            logger,
        }
    }

    /// Add a book to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::DuplicateTitle` if the catalog already holds a
    /// book with the same title. Titles are the catalog key, so a second
    /// copy under the same title would break loan tracking.
    pub fn add_book(&mut self, book: Book) -> Result<(), LendingError> {
        if self.catalog.contains_key(&book.title) {
            let error = LendingError::DuplicateTitle {
                title: book.title.clone(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        }
        self.logger.log(&format!("Added book: {}", book.title));
        self.catalog.insert(book.title.clone(), book);
        Ok(())
    }

    /// Register a user so their loans can be tracked.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::DuplicateUser` if a user with the same id is
    /// already registered.
    pub fn register_user(&mut self, user: User) -> Result<(), LendingError> {
        if self.users.contains_key(&user.id) {
            let error = LendingError::DuplicateUser {
                id: user.id.clone(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        }
        self.logger
            .log(&format!("Registered user: {} ({})", user.name, user.id));
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Lend the book `title` to the user `user_id`.
    ///
    /// On success the book moves to `OnLoan` stamped with the current time,
    /// the active-loans map records the holder, and an open record is
    /// appended to the user's history. Every refusal is logged and leaves
    /// the library untouched, so a rejected call can simply be retried
    /// later.
    ///
    /// # Errors
    ///
    /// - `LendingError::BookNotFound` / `LendingError::UserNotFound` for
    ///   unknown keys
    /// - `LendingError::BookUnavailable` if the book is already out
    /// - `LendingError::BorrowLimitReached` if another loan would exceed
    ///   the user's membership cap (users without a membership cannot
    ///   borrow)
    pub fn load_book(&mut self, title: &str, user_id: &str) -> Result<(), LendingError> {
        let Some(book) = self.catalog.get_mut(title) else {
            let error = LendingError::BookNotFound {
                title: title.to_string(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        };
        let Some(user) = self.users.get_mut(user_id) else {
            let error = LendingError::UserNotFound {
                id: user_id.to_string(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        };
        if !book.is_available() {
            let error = LendingError::BookUnavailable {
                title: title.to_string(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        }
        let prospective = user.open_loan_count().saturating_add(1);
        if !membership::can_borrow(user.membership, prospective) {
            let error = LendingError::BorrowLimitReached {
                id: user_id.to_string(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        }

        let now = Utc::now();
        book.check_out(now);
        self.active_loans
            .insert(title.to_string(), user_id.to_string());
        user.record_borrow(title, now);
        self.logger
            .log(&format!("{} has borrowed \"{title}\"", user.name));
        Ok(())
    }

    /// Take the book `title` back and assess any late fine.
    ///
    /// The fine is computed while the book still carries its borrow date,
    /// with the same instant that closes the history record. Returns the
    /// assessed amount, zero when the book came back on time.
    ///
    /// # Errors
    ///
    /// - `LendingError::BookNotFound` for an unknown title
    /// - `LendingError::AlreadyAvailable` if the book is not out; nothing
    ///   changes
    /// - `LendingError::InconsistentLoanState` if the book is flagged as on
    ///   loan but no holder is recorded. The book is left on loan: the
    ///   inconsistency is surfaced, not papered over.
    pub fn return_book(&mut self, title: &str) -> Result<i64, LendingError> {
        let Some(book) = self.catalog.get_mut(title) else {
            let error = LendingError::BookNotFound {
                title: title.to_string(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        };
        if book.is_available() {
            let error = LendingError::AlreadyAvailable {
                title: title.to_string(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        }
        let holder = self.active_loans.get(title).cloned();
        let Some(user) = holder.and_then(|user_id| self.users.get_mut(&user_id)) else {
            let error = LendingError::InconsistentLoanState {
                title: title.to_string(),
            };
            self.logger.log(&error.to_string());
            return Err(error);
        };

        let now = Utc::now();
        // Assess the fine while the book still carries its borrow date
        let fine = self.fine_manager.fine_at(book, now);

        self.active_loans.remove(title);
        book.check_in();
        if let Some(record) = user.open_loan_mut(title) {
            record.returned_at = Some(now);
        }
        self.logger
            .log(&format!("{} has returned \"{title}\"", user.name));
        if fine > 0 {
            self.logger.log(&format!("Fine assessed: ${fine}"));
        }
        Ok(fine)
    }

    /// Look up a book by title, logging when nothing matches.
    ///
    /// An absent title is a valid result, not a failure.
    #[must_use]
    pub fn find_book_by_title(&self, title: &str) -> Option<&Book> {
        let book = self.catalog.get(title);
        if book.is_none() {
            self.logger.log(&format!("No book titled \"{title}\" in the catalog"));
        }
        book
    }

    /// Log whether `book` carries the expected title. Observability only.
    pub fn validate_book_title(&self, book: &Book, expected_title: &str) {
        if book.title == expected_title {
            self.logger.log("The book has the expected title");
        } else {
            self.logger.log("The book does not have the expected title");
        }
    }

    /// Quiet catalog lookup
    #[must_use]
    pub fn book(&self, title: &str) -> Option<&Book> {
        self.catalog.get(title)
    }

    /// Quiet user-registry lookup
    #[must_use]
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Id of the user currently holding `title`, if it is out
    #[must_use]
    pub fn active_loan_holder(&self, title: &str) -> Option<&str> {
        self.active_loans.get(title).map(String::as_str)
    }

    /// Number of books currently out on loan
    #[must_use]
    pub fn active_loan_count(&self) -> usize {
        self.active_loans.len()
    }
}
