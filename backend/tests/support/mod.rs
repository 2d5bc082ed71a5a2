//! Shared helpers for the integration suites that need PostgreSQL.

pub mod cluster_skip;
pub mod embedded_postgres;

/// Render a `postgres` error with its SQLSTATE and server message.
///
/// The `Display` form of `postgres::Error` often reads just `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}
