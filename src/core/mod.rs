//! Core application module
//!
//! This module contains:
//! - The app that owns the edit session and runs submissions

pub mod app;

pub use app::App;
