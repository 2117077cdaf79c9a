//! Pictures: append-only logs of vector draw actions, and the generators that produce them.

/// Draw actions and their stroke geometry.
pub mod action;
/// Procedural picture generators.
pub mod generator;
/// The picture log and its shared, identity-compared handle.
pub mod model;
