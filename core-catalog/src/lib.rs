//! # Catalog Module
//!
//! Typed access to the podcast and event collections of the document store.
//!
//! ## Overview
//!
//! - [`models`]: `Podcast` and `Event` records decoded from store documents
//! - [`query`]: category and title filtering for the podcast list
//! - [`service`]: `CatalogService`, which lists collections and builds the
//!   newest/recommended shelves
//!
//! Podcasts convert to playable tracks with [`Podcast::track`].

pub mod error;
pub mod models;
pub mod query;
pub mod service;

pub use error::{CatalogError, Result};
pub use models::{Event, Podcast};
pub use query::{CategoryFilter, PodcastQuery, ALL_CATEGORIES_LABEL, DEFAULT_CATEGORIES};
pub use service::CatalogService;
