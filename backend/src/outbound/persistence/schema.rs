//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly.

diesel::table! {
    /// Parent records.
    cities (id) {
        /// Primary key generated by `SERIAL`.
        id -> Int4,
        /// Display name (max 50 characters).
        name -> Varchar,
        /// Optional description (max 200 characters).
        description -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Child records. Rows are removed with their city (`ON DELETE CASCADE`).
    points_of_interest (id) {
        /// Primary key generated by `SERIAL`.
        id -> Int4,
        /// Owning city.
        city_id -> Int4,
        /// Display name (max 50 characters).
        name -> Varchar,
        /// Description (max 200 characters), empty when not given.
        description -> Varchar,
    }
}

diesel::joinable!(points_of_interest -> cities (city_id));
diesel::allow_tables_to_appear_in_same_query!(cities, points_of_interest);
