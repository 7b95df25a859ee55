//! Moodify Library
//!
//! This library exposes modules for integration testing

pub mod config;
pub mod db;
pub mod emotion;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod services;
pub mod state;
pub mod tasks;
pub mod test_utils;
