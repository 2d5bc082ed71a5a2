//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting the authenticated user or
//! checking its city claim.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthenticatedUser, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const CITY_CLAIM_KEY: &str = "city";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id and claims in the session cookie.
    pub fn persist_user(&self, user: &AuthenticatedUser) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id().to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        match user.city() {
            Some(city) => self
                .0
                .insert(CITY_CLAIM_KEY, city)
                .map_err(|error| Error::internal(format!("failed to persist session: {error}"))),
            None => {
                self.0.remove(CITY_CLAIM_KEY);
                Ok(())
            }
        }
    }

    /// Fetch the current user from the session, if present.
    ///
    /// A tampered or malformed cookie is treated as anonymous.
    pub fn user(&self) -> Result<Option<AuthenticatedUser>, Error> {
        let read = |key| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let Some(raw_id) = read(USER_ID_KEY)? else {
            return Ok(None);
        };
        let city = read(CITY_CLAIM_KEY)?;
        let user = UserId::new(&raw_id).and_then(|id| AuthenticatedUser::new(id, city));
        match user {
            Ok(user) => Ok(Some(user)),
            Err(error) => {
                warn!(%error, "invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<AuthenticatedUser, Error> {
        self.user()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an authenticated user whose city claim equals `required`.
    ///
    /// With no requirement any authenticated user passes; otherwise a missing
    /// or different claim yields `403 Forbidden`.
    pub fn require_city_claim(&self, required: Option<&str>) -> Result<AuthenticatedUser, Error> {
        let user = self.require_user()?;
        if user.satisfies_city_claim(required) {
            Ok(user)
        } else {
            Err(Error::forbidden("the session's city claim does not grant access"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
