//! Image content for the cards
//!
//! Sources answer one query at a time; the loader wraps them with bounded
//! retries so the table always starts with something to show or a clear error.

pub mod loader;
pub mod query;
pub mod source;

pub use loader::ContentLoader;
pub use query::QueryPool;
pub use source::{images_from_response, parse_images, ContentSource, HttpContentSource, ImageEntry};
