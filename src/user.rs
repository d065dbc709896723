use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::membership::MembershipTier;

/// One entry in a user's loan history
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoanRecord {
    /// Title of the borrowed book
    pub book_title: String,
    /// When the loan started
    pub borrowed_at: DateTime<Utc>,
    /// When the book came back; the loan is open while this is `None`
    pub returned_at: Option<DateTime<Utc>>,
}

/// A registered library user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    /// Unique user id
    pub id: String,
    /// Display name
    pub name: String,
    /// Membership tier; a user without one cannot borrow
    pub membership: Option<MembershipTier>,
    /// Loan history, appended on borrow and closed on return
    loan_history: Vec<LoanRecord>,
}

impl User {
    /// Create a new user with an empty loan history
    #[must_use]
    pub fn new(id: &str, name: &str, membership: Option<MembershipTier>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            membership,
            loan_history: Vec::new(),
        }
    }

    /// Full loan history, oldest first
    #[must_use]
    pub fn loan_history(&self) -> &[LoanRecord] {
        &self.loan_history
    }

    /// Number of loans currently open (borrowed and not yet returned)
    #[must_use]
    pub fn open_loan_count(&self) -> usize {
        self.loan_history
            .iter()
            .filter(|record| record.returned_at.is_none())
            .count()
    }

    /// Append an open loan record for `book_title`
    pub(crate) fn record_borrow(&mut self, book_title: &str, borrowed_at: DateTime<Utc>) {
        self.loan_history.push(LoanRecord {
            book_title: book_title.to_string(),
            borrowed_at,
            returned_at: None,
        });
    }

    /// The open loan record for `book_title`, if one exists.
    ///
    /// At most one record per title can be open at a time, because a loan
    /// is only recorded when the book itself is available.
    pub(crate) fn open_loan_mut(&mut self, book_title: &str) -> Option<&mut LoanRecord> {
        self.loan_history
            .iter_mut()
            .find(|record| record.book_title == book_title && record.returned_at.is_none())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::User;
    use crate::membership::MembershipTier;

    #[test]
    fn test_open_loan_count_ignores_closed_records() {
        let mut user = User::new("1", "Alice", Some(MembershipTier::Basic));
        assert_eq!(user.open_loan_count(), 0);

        let now = Utc::now();
        user.record_borrow("Sapiens", now);
        user.record_borrow("Encyclopedia", now);
        assert_eq!(user.open_loan_count(), 2);

        if let Some(record) = user.open_loan_mut("Sapiens") {
            record.returned_at = Some(now);
        }
        assert_eq!(user.open_loan_count(), 1);
    }

    #[test]
    fn test_open_loan_mut_skips_closed_records() {
        let mut user = User::new("1", "Alice", None);
        let now = Utc::now();

        user.record_borrow("Sapiens", now);
        if let Some(record) = user.open_loan_mut("Sapiens") {
            record.returned_at = Some(now);
        }

        assert!(user.open_loan_mut("Sapiens").is_none());
        assert_eq!(user.loan_history().len(), 1);
    }
}
