//! Security hardening subsystem.
//!
//! # Components
//! - cors.rs: cross-origin policy (any origin by default)
//! - headers.rs: security response headers
//!
//! Body size and request time limits are tower-http layers configured in
//! `http::server`.

pub mod cors;
pub mod headers;
