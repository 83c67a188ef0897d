//! Session repository.
//!
//! Sessions live inside a course's modules and are always addressed through
//! the owning course. Traversal order is fixed: modules in document order,
//! then sessions in order within each module, first match wins.

use cursus_store::{Session, SessionPatch, StoreHandle};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// Operations over the sessions of one course.
///
/// There is intentionally no delete: removing a session is not part of the
/// catalog's contract. Session ids are unique within their course and only
/// checked when the session is created; updates may overwrite ids freely.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    store: StoreHandle,
}

impl SessionRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// All sessions of the course, flattened across its modules in
    /// traversal order. A course without modules has no sessions.
    pub async fn list_for_course(&self, course_id: i64) -> Result<Vec<Session>> {
        let document = self.store.load().await;
        let course = document
            .find_course(course_id)
            .ok_or(CatalogError::CourseNotFound(course_id))?;
        Ok(course.sessions().cloned().collect())
    }

    /// Adds a session to the course and persists the document.
    ///
    /// Refused with [`CatalogError::SessionExists`] when the id is already
    /// present in any module of this course; other courses are never
    /// consulted. The session is appended to the course's first module,
    /// which is synthesized as the placeholder module when the course has
    /// none.
    pub async fn create_for_course(&self, course_id: i64, session: Session) -> Result<Session> {
        let _write = self.store.begin_write().await;
        let mut document = self.store.load().await;

        let course = document
            .find_course_mut(course_id)
            .ok_or(CatalogError::CourseNotFound(course_id))?;
        if course.has_session(session.id) {
            debug!(
                course_id,
                session_id = session.id,
                "Session creation refused, id taken"
            );
            return Err(CatalogError::SessionExists {
                course_id,
                session_id: session.id,
            });
        }

        course.first_module_mut().sessions_mut().push(session.clone());
        self.store.save(&document).await?;
        info!(course_id, session_id = session.id, "Session created");
        Ok(session)
    }

    /// Shallow-merges `patch` into the first session with this id and
    /// persists.
    ///
    /// Behaves like the course update: present fields replace the stored
    /// value wholesale, `id` included, with no fresh uniqueness scan.
    pub async fn update(
        &self,
        course_id: i64,
        session_id: i64,
        patch: SessionPatch,
    ) -> Result<Session> {
        let _write = self.store.begin_write().await;
        let mut document = self.store.load().await;

        let course = document
            .find_course_mut(course_id)
            .ok_or(CatalogError::CourseNotFound(course_id))?;
        let session = course
            .find_session_mut(session_id)
            .ok_or(CatalogError::SessionNotFound {
                course_id,
                session_id,
            })?;
        session.apply(patch);
        let updated = session.clone();

        self.store.save(&document).await?;
        info!(course_id, session_id, "Session updated");
        Ok(updated)
    }
}
