//! Cursus HTTP API.
//!
//! The axum router and handlers exposing the course catalog over REST,
//! together with the server's configuration. Persistence and domain rules
//! live in the `cursus-store` and `cursus-catalog` crates; this one only
//! translates HTTP to repository calls and repository errors to status
//! codes.

pub mod api;
pub mod config;
pub mod error;

pub use api::{
    create_router, AppState, CourseListResponse, CourseResponse, MessageResponse,
    SessionListResponse, SessionResponse,
};
pub use config::ServerConfig;
pub use error::{ConfigError, Result};
