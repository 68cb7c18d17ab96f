//! Request extractors and response middleware.

pub mod auth;
pub mod rbac;
pub mod security_headers;
