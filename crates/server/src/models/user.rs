//! User domain types.

use pricewatch_core::UserId;

/// A registered user (domain type).
///
/// At least one of `phone` / `email` is non-empty; registration enforces
/// this before the row is created. Users with an empty email are skipped
/// when price-change notifications fan out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Phone number, possibly empty.
    pub phone: String,
    /// Email address, possibly empty.
    pub email: String,
}

/// Optional filters for a single-user lookup.
///
/// Absent fields do not constrain the query; supplied fields are ANDed.
/// Registration uses the phone/email fields together to discover an
/// existing candidate before inserting.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<UserId>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserFilter {
    /// Filter by user ID only.
    #[must_use]
    pub const fn by_id(id: UserId) -> Self {
        Self {
            id: Some(id),
            email: None,
            phone: None,
        }
    }

    /// Candidate-matching filter from the supplied registration fields.
    ///
    /// Empty strings are treated as "not supplied".
    #[must_use]
    pub fn matching(phone: &str, email: &str) -> Self {
        Self {
            id: None,
            email: (!email.is_empty()).then(|| email.to_owned()),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
        }
    }
}
