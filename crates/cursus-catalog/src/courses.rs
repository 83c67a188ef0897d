//! Course repository.

use cursus_store::{Course, CoursePatch, StoreHandle};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// CRUD over top-level courses.
///
/// The repository is stateless: every operation loads the document fresh
/// from the store, and mutating operations hold the handle's write lock
/// for their whole load-modify-save cycle.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    store: StoreHandle,
}

impl CourseRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Every course in the document, in stored order.
    pub async fn list(&self) -> Vec<Course> {
        self.store.load().await.cours
    }

    /// Adds a new course and persists the document.
    ///
    /// Refused with [`CatalogError::CourseExists`] when any stored course
    /// already carries the same id. The input is appended verbatim,
    /// uninterpreted fields included.
    pub async fn create(&self, course: Course) -> Result<Course> {
        let _write = self.store.begin_write().await;
        let mut document = self.store.load().await;

        if document.contains_course(course.id) {
            debug!(course_id = course.id, "Course creation refused, id taken");
            return Err(CatalogError::CourseExists(course.id));
        }

        document.cours.push(course.clone());
        self.store.save(&document).await?;
        info!(course_id = course.id, "Course created");
        Ok(course)
    }

    /// First course with this id.
    pub async fn get(&self, course_id: i64) -> Result<Course> {
        self.store
            .load()
            .await
            .find_course(course_id)
            .cloned()
            .ok_or(CatalogError::CourseNotFound(course_id))
    }

    /// Shallow-merges `patch` into the stored course and persists.
    ///
    /// Fields carried by the patch replace the stored value wholesale, `id`
    /// included; fields it omits survive unchanged. A replacement id is not
    /// re-checked against the rest of the document.
    pub async fn update(&self, course_id: i64, patch: CoursePatch) -> Result<Course> {
        let _write = self.store.begin_write().await;
        let mut document = self.store.load().await;

        let course = document
            .find_course_mut(course_id)
            .ok_or(CatalogError::CourseNotFound(course_id))?;
        course.apply(patch);
        let updated = course.clone();

        self.store.save(&document).await?;
        info!(course_id, "Course updated");
        Ok(updated)
    }

    /// Removes the first course with this id and persists.
    pub async fn delete(&self, course_id: i64) -> Result<()> {
        let _write = self.store.begin_write().await;
        let mut document = self.store.load().await;

        if document.remove_course(course_id).is_none() {
            return Err(CatalogError::CourseNotFound(course_id));
        }

        self.store.save(&document).await?;
        info!(course_id, "Course deleted");
        Ok(())
    }
}
