//! Edit session management
//!
//! This module contains:
//! - Session state and its transitions
//! - Pointer recording for the draw tools
//! - Message types and their handlers

pub mod handlers;
pub mod messages;
pub mod recorder;
pub mod state;

pub use handlers::handle_edit_msg;
pub use messages::{EditMsg, PointerAction};
pub use state::{EditSession, SessionSettings, SubmissionStatus};
