//! Test fixtures for mock HTTP response bodies.
//!
//! - `factory` - JSON bodies served by the backend and the identity provider

pub mod factory;
