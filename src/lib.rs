//! Listing search for a marketplace backend.
//!
//! A [`FilterRequest`] is composed into document store predicates, the matching
//! listings are enriched with preview image URLs, and non-empty search terms
//! are remembered in a small persisted history.

pub mod config;
pub mod error;
pub mod filter;
pub mod kv;
pub mod preview;
pub mod query;
pub mod recent;
pub mod search;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use filter::{Facet, FilterRequest, SortBy};
pub use search::SearchEngine;
pub use types::{EnrichedListing, Listing};
