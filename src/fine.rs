use chrono::{DateTime, Duration, Utc};

use crate::book::Book;

/// Seconds in one day, the granularity fines are assessed at
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Prices overdue returns.
///
/// Every loan runs for a standard period; past the due instant each started
/// day is billed at the daily rate. The calculation is a pure function of
/// the book's borrow date and a reference instant, so the library evaluates
/// it at return time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FineManager {
    /// Standard loan period in days
    loan_period_days: i64,
    /// Fine charged per full or started day late
    fine_rate_per_day: i64,
}

impl Default for FineManager {
    fn default() -> Self {
        Self {
            loan_period_days: 7,
            fine_rate_per_day: 1,
        }
    }
}

impl FineManager {
    /// Create a fine manager with a custom loan period and daily rate
    #[must_use]
    pub fn new(loan_period_days: i64, fine_rate_per_day: i64) -> Self {
        Self {
            loan_period_days,
            fine_rate_per_day,
        }
    }

    /// When a loan started at `borrowed_at` falls due
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn due_date(&self, borrowed_at: DateTime<Utc>) -> DateTime<Utc> {
        borrowed_at + Duration::days(self.loan_period_days)
    }

    /// Fine owed at `now` for a loan started at `borrowed_at`.
    ///
    /// Zero at and before the due instant. Past it, every started day counts
    /// in full: one second late already bills one day.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn fine_for(&self, borrowed_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let late_seconds = (now - self.due_date(borrowed_at)).num_seconds();
        if late_seconds <= 0 {
            return 0;
        }
        let days_late = (late_seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        days_late * self.fine_rate_per_day
    }

    /// Fine owed at `now` for `book`. An available book carries no fine.
    #[must_use]
    pub fn fine_at(&self, book: &Book, now: DateTime<Utc>) -> i64 {
        match book.borrowed_at() {
            Some(borrowed_at) => self.fine_for(borrowed_at, now),
            None => 0,
        }
    }

    /// Fine owed for `book` as of the current wall clock
    #[must_use]
    pub fn calculate_fine(&self, book: &Book) -> i64 {
        self.fine_at(book, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::FineManager;
    use crate::book::{Book, BookCategory};

    /// Fixed reference instant so the tests never race the wall clock
    #[allow(clippy::unwrap_used)]
    fn borrowed() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_no_fine_on_time() {
        let fines = FineManager::default();

        assert_eq!(fines.fine_for(borrowed(), borrowed()), 0);
        assert_eq!(fines.fine_for(borrowed(), borrowed() + Duration::days(5)), 0);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_due_instant_is_not_late() {
        let fines = FineManager::default();
        let due = fines.due_date(borrowed());

        assert_eq!(due, borrowed() + Duration::days(7));
        assert_eq!(fines.fine_for(borrowed(), due), 0);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_partial_days_round_up() {
        let fines = FineManager::default();
        let due = fines.due_date(borrowed());

        assert_eq!(fines.fine_for(borrowed(), due + Duration::seconds(1)), 1);
        assert_eq!(fines.fine_for(borrowed(), due + Duration::hours(36)), 2);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_three_days_late_costs_three() {
        let fines = FineManager::default();

        assert_eq!(fines.fine_for(borrowed(), borrowed() + Duration::days(10)), 3);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_fine_is_monotone_in_now() {
        let fines = FineManager::default();
        let mut previous = 0;

        for hours in 0..(12 * 24) {
            let fine = fines.fine_for(borrowed(), borrowed() + Duration::hours(hours));
            assert!(fine >= previous);
            previous = fine;
        }
    }

    #[test]
    fn test_available_book_has_no_fine() {
        let fines = FineManager::default();
        let book = Book::new("Sapiens", "Yuval Noah Harari", BookCategory::NonFiction);

        assert_eq!(fines.fine_at(&book, borrowed()), 0);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_calculate_fine_uses_the_wall_clock() {
        let fines = FineManager::default();
        let mut book = Book::new("Sapiens", "Yuval Noah Harari", BookCategory::NonFiction);

        // Ten days out on a seven-day period leaves three days late. The
        // one-minute cushion keeps the ceiling at three even though the
        // wall clock keeps moving under the test.
        book.check_out(Utc::now() - Duration::days(10) + Duration::minutes(1));

        assert_eq!(fines.calculate_fine(&book), 3);
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn test_custom_period_and_rate() {
        let fines = FineManager::new(14, 2);

        assert_eq!(fines.fine_for(borrowed(), borrowed() + Duration::days(14)), 0);
        assert_eq!(fines.fine_for(borrowed(), borrowed() + Duration::days(15)), 2);
    }
}
