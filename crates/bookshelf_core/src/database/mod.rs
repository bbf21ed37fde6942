//! Catalog store
//!
//! Exposes the `Db` struct and its methods to read and write the `books` and `goodreads` tables
//! through pre-defined queries, together with the record types and their derived views.
pub mod errors;
pub mod queries;
mod rows;
mod schema;
pub mod types;
mod views;
