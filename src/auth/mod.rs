//! Authentication state: durable client storage and the token manager.
//!
//! This module owns the credential lifecycle. [`TokenManager`] persists the
//! bearer token through a [`ClientStorage`] backend, mirrors it into the
//! `connect.sid` session cookie, and publishes it through [`AuthState`] for
//! the HTTP client to read. [`MemoryStorage`] is the built-in backend, used
//! both in production single-process setups and as an isolated store in tests.

mod storage;
mod token;

pub use storage::{ClientStorage, MemoryStorage};
pub use token::{AuthState, TokenManager, SESSION_COOKIE_NAME, TOKEN_STORAGE_KEY};
