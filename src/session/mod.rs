//! Admin Session
//!
//! Everything between the console and the admin backend.
//!
//! ## Architecture
//!
//! - **SessionClient**: owns the bearer token and calls the fixed endpoints
//! - **TokenStore**: durable storage for the token (file or in-memory)
//! - **Endpoint**: the backend's REST paths
//!
//! ## Lifecycle
//!
//! 1. The client restores any persisted token when constructed
//! 2. `login` stores a fresh token in memory and in the token store
//! 3. Every resource call is decorated with `Authorization: Bearer <token>`
//! 4. `logout` drops the token from memory and from the store

mod client;
mod endpoints;
mod error;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{add_auth_header, ClientConfig, Credentials, SessionClient};
pub use endpoints::{Endpoint, DEFAULT_BASE_URL};
pub use error::{AdminError, AdminResult};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
