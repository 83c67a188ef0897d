//! The catalog document model.
//!
//! Everything the service knows lives in one flat JSON document: a list of
//! courses, each course optionally holding modules, each module optionally
//! holding sessions. The wire vocabulary is fixed by the stored format:
//! `cours`, `modules`, `seances`, `id`. Beyond `id` and the two nesting
//! fields, entities carry whatever fields clients send; those are kept in a
//! flattened map and round-trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier given to the module synthesized for a course without modules.
pub const PLACEHOLDER_MODULE_ID: &str = "module_1";

/// Title given to the module synthesized for a course without modules.
pub const PLACEHOLDER_MODULE_TITLE: &str = "Nouveau module";

/// Root of the persisted document.
///
/// The default value is the empty catalog, `{"cours": []}`, which is also
/// what stores fall back to when their backing data is missing or unusable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Every course in the catalog, in insertion order.
    #[serde(default)]
    pub cours: Vec<Course>,
}

impl Document {
    /// Creates the empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First course with this id, in document order.
    #[must_use]
    pub fn find_course(&self, course_id: i64) -> Option<&Course> {
        self.cours.iter().find(|course| course.id == course_id)
    }

    /// Mutable access to the first course with this id.
    pub fn find_course_mut(&mut self, course_id: i64) -> Option<&mut Course> {
        self.cours.iter_mut().find(|course| course.id == course_id)
    }

    /// Returns `true` when any course carries this id.
    #[must_use]
    pub fn contains_course(&self, course_id: i64) -> bool {
        self.find_course(course_id).is_some()
    }

    /// Removes and returns the first course with this id.
    ///
    /// Later courses with the same id (possible after an id-overwriting
    /// update) are left in place.
    pub fn remove_course(&mut self, course_id: i64) -> Option<Course> {
        let index = self.cours.iter().position(|course| course.id == course_id)?;
        Some(self.cours.remove(index))
    }
}

/// A top-level course record.
///
/// Only `id` and `modules` are interpreted; every other field rides along
/// in `extra` exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course identifier. Uniqueness is checked at creation time only.
    pub id: i64,

    /// Ordered module list. Absent and empty read the same way; the
    /// distinction survives re-serialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<Module>>,

    /// Fields the catalog stores without interpreting.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    /// The course's modules, treating an absent list as empty.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        self.modules.as_deref().unwrap_or_default()
    }

    /// All sessions of the course: modules in document order, sessions in
    /// order within each module.
    ///
    /// ```
    /// use cursus_store::Course;
    /// use serde_json::json;
    ///
    /// let course: Course = serde_json::from_value(json!({
    ///     "id": 1,
    ///     "modules": [
    ///         {"id": "m1", "seances": [{"id": 10}]},
    ///         {"id": "m2", "seances": [{"id": 20}, {"id": 30}]},
    ///     ],
    /// })).unwrap();
    ///
    /// let ids: Vec<i64> = course.sessions().map(|s| s.id).collect();
    /// assert_eq!(ids, [10, 20, 30]);
    /// ```
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.modules().iter().flat_map(Module::sessions)
    }

    /// First session with this id, scanning in traversal order.
    #[must_use]
    pub fn find_session(&self, session_id: i64) -> Option<&Session> {
        self.sessions().find(|session| session.id == session_id)
    }

    /// Mutable access to the first session with this id.
    pub fn find_session_mut(&mut self, session_id: i64) -> Option<&mut Session> {
        self.modules
            .as_mut()?
            .iter_mut()
            .filter_map(|module| module.seances.as_mut())
            .flat_map(|sessions| sessions.iter_mut())
            .find(|session| session.id == session_id)
    }

    /// Returns `true` when any module of the course holds this session id.
    #[must_use]
    pub fn has_session(&self, session_id: i64) -> bool {
        self.find_session(session_id).is_some()
    }

    /// First module in document order, synthesizing the placeholder module
    /// when the course has none. New sessions are always appended here.
    pub fn first_module_mut(&mut self) -> &mut Module {
        let modules = self.modules.get_or_insert_with(Vec::new);
        if modules.is_empty() {
            modules.push(Module::placeholder());
        }
        &mut modules[0]
    }

    /// Overlays a partial update, field by field.
    ///
    /// Fields carried by the patch replace the stored value wholesale;
    /// fields it omits survive unchanged. `id` is replaced like any other
    /// field and is not re-checked for uniqueness.
    pub fn apply(&mut self, patch: CoursePatch) {
        if let Some(id) = patch.id {
            self.id = id;
        }
        if let Some(modules) = patch.modules {
            self.modules = Some(modules);
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
    }
}

/// A module inside a course.
///
/// Modules are pure containers here: the catalog never creates, updates, or
/// deletes them directly, apart from synthesizing the placeholder module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module identifier. String or integer, never validated.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,

    /// Sessions held by this module, in insertion order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seances: Option<Vec<Session>>,

    /// Fields the catalog stores without interpreting.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    /// The module's sessions, treating an absent list as empty.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        self.seances.as_deref().unwrap_or_default()
    }

    /// Mutable session list, created empty when absent.
    pub fn sessions_mut(&mut self) -> &mut Vec<Session> {
        self.seances.get_or_insert_with(Vec::new)
    }

    /// The module synthesized when a session is created in a course that
    /// has no modules yet: `module_1` / `Nouveau module`.
    #[must_use]
    pub fn placeholder() -> Self {
        let mut extra = Map::new();
        extra.insert(
            "titre".to_owned(),
            Value::String(PLACEHOLDER_MODULE_TITLE.to_owned()),
        );
        Self {
            id: Value::String(PLACEHOLDER_MODULE_ID.to_owned()),
            seances: Some(Vec::new()),
            extra,
        }
    }
}

/// A session inside a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier. Unique within the owning course, checked at
    /// creation time only.
    pub id: i64,

    /// Fields the catalog stores without interpreting.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// Overlays a partial update, field by field, exactly like
    /// [`Course::apply`].
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(id) = patch.id {
            self.id = id;
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
    }
}

/// Partial course update.
///
/// Deserialized from whatever object the client sends. Typed fields are
/// optional; a JSON `null` reads as absent. Everything else lands in
/// `extra` and overlays the stored course's uninterpreted fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    /// Replacement identifier, applied without a fresh uniqueness check.
    pub id: Option<i64>,

    /// Wholesale replacement of the module list.
    pub modules: Option<Vec<Module>>,

    /// Uninterpreted fields to overlay.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial session update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPatch {
    /// Replacement identifier, applied without a fresh uniqueness check.
    pub id: Option<i64>,

    /// Uninterpreted fields to overlay.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
