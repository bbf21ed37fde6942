//! `bookshelf_core`
//!
//! Core library of Bookshelf, a catalog of books and the Goodreads metadata found for them. The
//! crate holds the storage schema, the data-access layer and the helpers that turn stored values
//! into text for display, so that any front end can share them.

pub mod database;

pub mod display;

pub use database::errors::CatalogError;
pub use database::queries::Db;
pub use database::types::{BookRecord, GoodreadsRecord, NewBook, NewGoodreads, RatingBucket};
