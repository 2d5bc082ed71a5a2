//! HTTP rendering of domain errors for the CityInfo routes.
//!
//! Store faults never reach clients verbatim. Internal errors and store
//! outages are replaced by fixed messages once the cause has been logged; the
//! trace id survives so the log line can still be found. Error responses are
//! never cached, and outages tell clients when to retry.

use std::borrow::Cow;

use actix_web::http::header::{CacheControl, CacheDirective, RETRY_AFTER};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "City store unavailable";
/// Seconds a client should wait after a store outage.
const RETRY_AFTER_SECONDS: &str = "5";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The payload a client may see for `error`.
fn public_view(error: &Error) -> Cow<'_, Error> {
    let replacement = match error.code() {
        ErrorCode::InternalError => {
            error!(message = error.message(), trace_id = ?error.trace_id(), "internal error");
            Error::internal(INTERNAL_MESSAGE)
        }
        ErrorCode::ServiceUnavailable => {
            debug!(message = error.message(), trace_id = ?error.trace_id(), "store outage redacted");
            Error::service_unavailable(UNAVAILABLE_MESSAGE)
        }
        _ => return Cow::Borrowed(error),
    };
    Cow::Owned(match error.trace_id() {
        Some(id) => replacement.with_trace_id(id.to_owned()),
        None => replacement,
    })
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(CacheControl(vec![CacheDirective::NoStore]));
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if matches!(self.code(), ErrorCode::ServiceUnavailable) {
            builder.insert_header((RETRY_AFTER, RETRY_AFTER_SECONDS));
        }

        builder.json(public_view(self))
    }
}
