//! HTTP inbound adapter exposing the CityInfo REST endpoints.
//!
//! Handlers stay thin: they authenticate the session, map request DTOs into
//! domain drafts, call a driving port from [`state::HttpState`], and map the
//! result back into response DTOs.

pub mod cities;
pub mod dto;
pub mod error;
pub mod health;
pub mod points_of_interest;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
