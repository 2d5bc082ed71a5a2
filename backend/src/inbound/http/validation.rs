//! Shared validation helpers for inbound HTTP adapters.
//!
//! Extractor failures (unparsable JSON, query strings, or path segments) are
//! turned into domain `invalid_request` errors here so every 400 response
//! shares the same payload shape.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use pagination::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidPageNumber,
    InvalidPageSize,
    MalformedBody,
    MalformedQuery,
    MalformedPath,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidPageNumber => "invalid_page_number",
            ErrorCode::InvalidPageSize => "invalid_page_size",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
            ErrorCode::MalformedPath => "malformed_path",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Media type of RFC 6902 patch documents.
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

pub(crate) const PAGE_NUMBER: FieldName = FieldName::new("pageNumber");
pub(crate) const PAGE_SIZE: FieldName = FieldName::new("pageSize");

/// Builder for validation errors with field context.
struct ValidationError {
    field: Option<String>,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    fn unscoped(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        let details = match self.field {
            Some(field) => json!({ "field": field, "code": code.as_str() }),
            None => json!({ "code": code.as_str() }),
        };
        Error::invalid_request(self.message).with_details(details)
    }

    fn with_value(self, code: ErrorCode, value: u32) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

/// Build a page request from raw query values.
///
/// Missing values fall back to page 1 of 10. Page sizes above
/// [`MAX_PAGE_SIZE`] are clamped; zero page numbers and sizes are rejected.
pub(crate) fn page_request(
    page_number: Option<u32>,
    page_size: Option<u32>,
) -> Result<PageRequest, Error> {
    let page_number = page_number.unwrap_or(DEFAULT_PAGE_NUMBER);
    if page_number == 0 {
        return Err(
            ValidationError::new(PAGE_NUMBER.as_str(), "pageNumber must be at least 1")
                .with_value(ErrorCode::InvalidPageNumber, page_number),
        );
    }
    let requested_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let clamped = requested_size.min(MAX_PAGE_SIZE);
    if clamped != requested_size {
        debug!(requested_size, clamped, "page size clamped");
    }
    PageRequest::new(page_number, clamped).map_err(|err| {
        ValidationError::new(PAGE_SIZE.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidPageSize, requested_size)
    })
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ValidationError::unscoped(format!("request body is not valid: {err}"))
        .with_code(ErrorCode::MalformedBody)
        .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ValidationError::unscoped(format!("query string is not valid: {err}"))
        .with_code(ErrorCode::MalformedQuery)
        .into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ValidationError::unscoped(format!("path is not valid: {err}"))
        .with_code(ErrorCode::MalformedPath)
        .into()
}

/// JSON extractor configuration reporting failures as `invalid_request`.
///
/// Bodies sent as `application/json-patch+json` are accepted alongside
/// `application/json`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type(|mime| mime.essence_str() == JSON_PATCH_CONTENT_TYPE)
        .error_handler(json_error)
}

/// Query extractor configuration reporting failures as `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

/// Path extractor configuration reporting failures as `invalid_request`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}
