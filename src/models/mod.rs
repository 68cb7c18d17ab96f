//! Database models and DTOs for all domain entities.

pub mod goal;
pub mod user;
pub mod workout;
