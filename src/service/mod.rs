//! Service layer.
//!
//! Services wrap the backend endpoints (token exchange, user listing, user administration) and
//! the session bootstrap that coordinates them. The exchange and listing are exposed through the
//! [`exchange::TokenExchange`] and [`listing::UserDirectory`] traits so the bootstrap can be
//! driven by any implementation.

pub mod bootstrap;
pub mod exchange;
pub mod listing;
pub mod users;
