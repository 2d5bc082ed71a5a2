//! Identity primitives: login input, user identifiers, and the claims an
//! authenticated session carries.
//!
//! The domain never validates tokens itself. It only receives the outcome of
//! a login and exposes the `city` claim as a simple gate.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Reasons a login payload or identity value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// User identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidUserId,
    /// The `city` claim was blank.
    #[error("city claim must not be blank")]
    BlankCityClaim,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim; it is zeroed on drop.
///
/// # Examples
/// ```
/// use cityinfo::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw username and password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, IdentityValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(IdentityValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a hyphenated UUID string.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = raw.as_ref();
        if raw.trim() != raw {
            return Err(IdentityValidationError::InvalidUserId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidUserId)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

/// Outcome of a successful login: who the caller is and which city they
/// are associated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: UserId,
    city: Option<String>,
}

impl AuthenticatedUser {
    /// Pair an identifier with an optional `city` claim.
    pub fn new(id: UserId, city: Option<String>) -> Result<Self, IdentityValidationError> {
        if city.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(IdentityValidationError::BlankCityClaim);
        }
        Ok(Self { id, city })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    /// Value of the `city` claim, if the identity provider issued one.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Whether the caller satisfies a required `city` claim.
    ///
    /// No requirement always passes.
    pub fn satisfies_city_claim(&self, required: Option<&str>) -> bool {
        required.is_none_or(|city| self.city() == Some(city))
    }
}
