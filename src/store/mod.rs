//! Process-wide mutable state of the session client.
//!
//! The credential store holds the single bearer token slot and the session store holds the
//! published session, the user listing and the bootstrap run generation. Both have exactly one
//! writer at a time; everything else observes them.

pub mod credential;
pub mod session;

pub use credential::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use session::{RunTicket, SessionState, SessionStore};
