use serde::{Deserialize, Serialize};

/// Membership tiers and the concurrent-loan caps they grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum MembershipTier {
    /// Up to 2 books at a time
    Basic,
    /// Up to 5 books at a time
    Premium,
    /// No cap
    Platinum,
}

impl MembershipTier {
    /// Whether this tier allows holding `book_count` books at once
    #[must_use]
    pub fn can_borrow(self, book_count: usize) -> bool {
        match self {
            Self::Basic => book_count <= 2,
            Self::Premium => book_count <= 5,
            Self::Platinum => true,
        }
    }
}

/// Borrow-cap decision for an optional tier.
///
/// A user without a membership may not borrow at all, so an absent tier
/// always answers no.
#[must_use]
pub fn can_borrow(tier: Option<MembershipTier>, book_count: usize) -> bool {
    tier.is_some_and(|tier| tier.can_borrow(book_count))
}

#[cfg(test)]
mod tests {
    use super::{MembershipTier, can_borrow};

    #[test]
    fn test_basic_boundary() {
        assert!(MembershipTier::Basic.can_borrow(2));
        assert!(!MembershipTier::Basic.can_borrow(3));
    }

    #[test]
    fn test_premium_boundary() {
        assert!(MembershipTier::Premium.can_borrow(5));
        assert!(!MembershipTier::Premium.can_borrow(6));
    }

    #[test]
    fn test_platinum_is_uncapped() {
        assert!(MembershipTier::Platinum.can_borrow(0));
        assert!(MembershipTier::Platinum.can_borrow(100));
        assert!(MembershipTier::Platinum.can_borrow(usize::MAX));
    }

    #[test]
    fn test_missing_tier_fails_closed() {
        assert!(!can_borrow(None, 0));
        assert!(!can_borrow(None, 1));
        assert!(can_borrow(Some(MembershipTier::Basic), 1));
    }
}
