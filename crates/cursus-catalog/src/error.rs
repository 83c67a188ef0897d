//! Error taxonomy for catalog operations.

use cursus_store::StoreError;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors surfaced by the course and session repositories.
///
/// Lookups fail with the not-found variants, creations with the conflict
/// variants, and a failed persist bubbles the store's error through
/// unchanged. Nothing else can go wrong at this layer: corrupt backing
/// data is already recovered inside the store and never reaches it.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No course with this id exists in the document.
    #[error("Course {0} not found")]
    CourseNotFound(i64),

    /// A course with this id already exists; creation is refused.
    #[error("Course {0} already exists")]
    CourseExists(i64),

    /// No session with this id exists in any module of the course.
    #[error("Session {session_id} not found in course {course_id}")]
    SessionNotFound {
        /// Course that was searched.
        course_id: i64,
        /// Session id that was not found.
        session_id: i64,
    },

    /// A session with this id already exists somewhere in the course.
    #[error("Session {session_id} already exists in course {course_id}")]
    SessionExists {
        /// Course that was scanned.
        course_id: i64,
        /// Conflicting session id.
        session_id: i64,
    },

    /// The backing store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Returns `true` for the two not-found conditions.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CourseNotFound(_) | Self::SessionNotFound { .. }
        )
    }

    /// Returns `true` for the two creation conflicts.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::CourseExists(_) | Self::SessionExists { .. })
    }
}
