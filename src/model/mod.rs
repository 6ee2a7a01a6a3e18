//! Data models shared between the services and the session store.

pub mod api;
pub mod identity;
pub mod session;
pub mod user;
