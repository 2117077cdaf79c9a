//! Editing session and scripted replays of it.

pub mod script;
pub mod session;
