//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, payload validation)
//!     → handlers.rs (store call)
//!     → response.rs / error.rs (JSON body, status code)
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::{NewReading, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
