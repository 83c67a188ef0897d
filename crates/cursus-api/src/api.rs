//! HTTP API endpoints for the course catalog.
//!
//! This module provides the REST API exposing the catalog's courses and
//! sessions. Collections come back under the stored document's field names
//! (`cours`, `seances`) and user-facing messages are French, matching the
//! service's published contract.
//!
//! # Endpoints
//!
//! - `GET /api/courses` - List every course
//! - `POST /api/courses` - Create a course
//! - `GET /api/courses/:course_id` - Fetch one course
//! - `PUT /api/courses/:course_id` - Merge a partial update into a course
//! - `DELETE /api/courses/:course_id` - Delete a course
//! - `GET /api/courses/:course_id/sessions` - List the course's sessions
//! - `POST /api/courses/:course_id/sessions` - Create a session in the course
//! - `PUT /api/courses/:course_id/sessions/:session_id` - Merge a partial update into a session
//!
//! # Example
//!
//! ```no_run
//! use cursus_api::{create_router, AppState};
//! use cursus_store::{JsonFileStore, StoreHandle};
//!
//! # async fn example() {
//! let store = StoreHandle::new(JsonFileStore::new("data.json"));
//! let router = create_router(AppState::new(store));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use cursus_catalog::{CatalogError, CourseRepository, SessionRepository};
use cursus_store::{Course, CoursePatch, Session, SessionPatch, StoreHandle};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

// ============================================================================
// User-Facing Messages
// ============================================================================

/// Returned with 404 when a course id cannot be found.
const COURSE_NOT_FOUND: &str = "Cours non trouvé.";
/// Returned with 400 when a course id is already taken.
const COURSE_EXISTS: &str = "Un cours avec cet ID existe déjà.";
/// Returned with 201 after a course creation.
const COURSE_CREATED: &str = "Cours créé avec succès.";
/// Returned with 200 after a course update.
const COURSE_UPDATED: &str = "Cours mis à jour avec succès.";
/// Returned with 200 after a course deletion.
const COURSE_DELETED: &str = "Cours supprimé avec succès.";
/// Returned with 404 when a session cannot be found in the course.
const SESSION_NOT_FOUND: &str = "Séance non trouvée.";
/// Returned with 400 when a session id is already taken in the course.
const SESSION_EXISTS: &str = "Une séance avec cet ID existe déjà dans le cours.";
/// Returned with 201 after a session creation.
const SESSION_CREATED: &str = "Séance créée avec succès.";
/// Returned with 200 after a session update.
const SESSION_UPDATED: &str = "Séance mise à jour avec succès.";
/// Returned with 500 when the store fails; the cause stays in the logs.
const INTERNAL_ERROR: &str = "Erreur interne du serveur.";

// ============================================================================
// Response Types
// ============================================================================

/// Response body for the course list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseListResponse {
    /// Every course in the catalog, in stored order.
    pub cours: Vec<Course>,
}

/// Response body wrapping a course with a confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResponse {
    /// Confirmation message, in French.
    pub message: String,
    /// The stored course after the operation.
    pub cours: Course,
}

/// Response body for the session list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// The course's sessions, flattened in traversal order.
    pub seances: Vec<Session>,
}

/// Response body wrapping a session with a confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Confirmation message, in French.
    pub message: String,
    /// The stored session after the operation.
    pub seance: Session,
}

/// Plain message body, returned by deletions and every error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-oriented message, in French.
    pub message: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
///
/// Both repositories ride on the same store handle, so course and session
/// mutations serialize behind one write lock.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Repository for top-level courses.
    pub courses: CourseRepository,
    /// Repository for the sessions nested inside courses.
    pub sessions: SessionRepository,
}

impl AppState {
    /// Creates the repositories over one shared store handle.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        Self {
            courses: CourseRepository::new(store.clone()),
            sessions: SessionRepository::new(store),
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// Entity missing; maps to 404.
    NotFound(&'static str),
    /// Creation conflict; maps to 400, as the contract specifies.
    Conflict(&'static str),
    /// Store failure; maps to 500 with a generic message.
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::CourseNotFound(_) => Self::NotFound(COURSE_NOT_FOUND),
            CatalogError::SessionNotFound { .. } => Self::NotFound(SESSION_NOT_FOUND),
            CatalogError::CourseExists(_) => Self::Conflict(COURSE_EXISTS),
            CatalogError::SessionExists { .. } => Self::Conflict(SESSION_EXISTS),
            CatalogError::Store(error) => Self::Internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.to_owned()),
            Self::Conflict(message) => (StatusCode::BAD_REQUEST, message.to_owned()),
            Self::Internal(detail) => {
                error!(error = %detail, "Request failed in the document store");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_owned())
            }
        };

        let body = Json(MessageResponse { message });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// # Arguments
///
/// * `state` - The shared application state
///
/// # Returns
///
/// An axum `Router` configured with:
/// - All API routes under `/api`
/// - CORS middleware for development
/// - Tracing middleware for request logging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS for development (allow all origins)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API routes
    let api_routes = Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:course_id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route(
            "/courses/:course_id/sessions",
            get(list_sessions).post(create_session),
        )
        .route(
            "/courses/:course_id/sessions/:session_id",
            put(update_session),
        );

    // Combine with state and middleware
    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Course Handlers
// ============================================================================

/// Handler for `GET /api/courses`.
///
/// Returns every course under the `cours` envelope.
async fn list_courses(State(state): State<Arc<AppState>>) -> Json<CourseListResponse> {
    let cours = state.courses.list().await;
    Json(CourseListResponse { cours })
}

/// Handler for `POST /api/courses`.
///
/// Appends the course verbatim unless its id is already taken.
async fn create_course(
    State(state): State<Arc<AppState>>,
    Json(course): Json<Course>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    info!(course_id = course.id, "Received course creation");

    let cours = state.courses.create(course).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            message: COURSE_CREATED.to_owned(),
            cours,
        }),
    ))
}

/// Handler for `GET /api/courses/:course_id`.
///
/// Returns the bare course object, uninterpreted fields included.
async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i64>,
) -> Result<Json<Course>, ApiError> {
    let course = state.courses.get(course_id).await?;
    Ok(Json(course))
}

/// Handler for `PUT /api/courses/:course_id`.
///
/// Shallow-merges the request body into the stored course.
async fn update_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i64>,
    Json(patch): Json<CoursePatch>,
) -> Result<Json<CourseResponse>, ApiError> {
    info!(course_id, "Received course update");

    let cours = state.courses.update(course_id, patch).await?;

    Ok(Json(CourseResponse {
        message: COURSE_UPDATED.to_owned(),
        cours,
    }))
}

/// Handler for `DELETE /api/courses/:course_id`.
async fn delete_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!(course_id, "Received course deletion");

    state.courses.delete(course_id).await?;

    Ok(Json(MessageResponse {
        message: COURSE_DELETED.to_owned(),
    }))
}

// ============================================================================
// Session Handlers
// ============================================================================

/// Handler for `GET /api/courses/:course_id/sessions`.
///
/// Returns the course's sessions under the `seances` envelope.
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i64>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let seances = state.sessions.list_for_course(course_id).await?;
    Ok(Json(SessionListResponse { seances }))
}

/// Handler for `POST /api/courses/:course_id/sessions`.
///
/// Appends the session to the course's first module, synthesizing the
/// placeholder module when the course has none.
async fn create_session(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i64>,
    Json(session): Json<Session>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    info!(course_id, session_id = session.id, "Received session creation");

    let seance = state.sessions.create_for_course(course_id, session).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: SESSION_CREATED.to_owned(),
            seance,
        }),
    ))
}

/// Handler for `PUT /api/courses/:course_id/sessions/:session_id`.
///
/// Shallow-merges the request body into the stored session.
async fn update_session(
    State(state): State<Arc<AppState>>,
    Path((course_id, session_id)): Path<(i64, i64)>,
    Json(patch): Json<SessionPatch>,
) -> Result<Json<SessionResponse>, ApiError> {
    info!(course_id, session_id, "Received session update");

    let seance = state.sessions.update(course_id, session_id, patch).await?;

    Ok(Json(SessionResponse {
        message: SESSION_UPDATED.to_owned(),
        seance,
    }))
}

// ============================================================================
// Tests
// ============================================================================
