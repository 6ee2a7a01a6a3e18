//! Session bootstrap and role-gated access for an e-commerce back-office dashboard.
//!
//! An identity provider signs staff in; every identity change is turned into a backend session
//! (token exchange, role, merged profile), privileged sessions additionally receive the user
//! listing, and every screen of the dashboard is gated on the session role.

pub mod app;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod identity;
pub mod model;
pub mod service;
pub mod startup;
pub mod store;

pub use app::App;
pub use error::Error;
