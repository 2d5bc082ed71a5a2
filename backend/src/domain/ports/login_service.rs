//! Driving port for login.
//!
//! Inbound adapters authenticate credentials through this port and store the
//! resulting identity in the session. Token validation and authorization
//! policy live outside this service.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the caller's identity and claims.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedUser, Error>;
}

/// Development authenticator.
///
/// `admin` / `password` signs in as a fixed user carrying the `Antwerp`
/// city claim.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

/// Identifier issued to the fixture user.
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// `city` claim issued to the fixture user.
pub const FIXTURE_CITY_CLAIM: &str = "Antwerp";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        if credentials.username() != "admin" || credentials.password() != "password" {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let id = UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        AuthenticatedUser::new(id, Some(FIXTURE_CITY_CLAIM.to_owned()))
            .map_err(|err| Error::internal(format!("invalid fixture claims: {err}")))
    }
}
