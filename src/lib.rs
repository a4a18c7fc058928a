//! Workout log pinned to map locations.
//!
//! [`controller::WorkoutLog`] owns the workouts and keeps the map, the list
//! and the key-value store in step with them. The map, list and store are
//! traits so the same controller drives the CLI and the tests.

pub mod cli;
pub mod controller;
pub mod database;
pub mod form;
pub mod map;
pub mod render;
pub mod storage;
pub mod types;
pub mod utils;
