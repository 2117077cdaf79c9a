//! Geometry, colour and error types shared by every layer.

pub mod core;
pub mod error;
