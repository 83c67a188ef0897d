//! Cursus catalog.
//!
//! Repositories implementing the catalog's operations over the stored
//! document: courses at the top level, sessions nested inside a course's
//! modules. Both repositories work through one shared [`StoreHandle`] and
//! reload the document on every call; nothing is cached between
//! operations, so the data file on disk is always the source of truth.
//!
//! [`StoreHandle`]: cursus_store::StoreHandle

pub mod courses;
pub mod error;
pub mod sessions;

pub use courses::CourseRepository;
pub use error::{CatalogError, Result};
pub use sessions::SessionRepository;
