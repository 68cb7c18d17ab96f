//! Business logic services.

pub mod auth;
pub mod dashboard;
pub mod goal;
pub mod workout;
