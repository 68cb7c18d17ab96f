//! Route definitions for the FitTrack API.

pub mod auth;
pub mod dashboard;
pub mod goals;
pub mod health;
pub mod workouts;
