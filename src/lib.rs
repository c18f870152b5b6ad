//! # RIMAC Admin
//!
//! Session client and console for the appointments administration backend.
//!
//! ## Features
//!
//! - **Session management**: login, persisted bearer token, logout
//! - **Resource accessors**: stats, appointments, medics, centers, specialties
//! - **Console views**: loading/error/data state per view with stale-result protection
//!
//! ## Modules
//!
//! - [`session`]: Session client, token storage and backend endpoints
//! - [`views`]: View controller and text renderers
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rimac_admin::session::{ClientConfig, FileTokenStore, SessionClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileTokenStore::in_dir("/tmp/rimac-admin"));
//!     let client = SessionClient::new(ClientConfig::default(), store).await?;
//!
//!     if !client.is_authenticated().await {
//!         client.login("admin", "rimac2024").await?;
//!     }
//!
//!     let stats = client.get_stats().await?;
//!     println!("{}", serde_json::to_string_pretty(&stats)?);
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod session;
pub mod views;

pub use session::{
    add_auth_header, AdminError, AdminResult, ClientConfig, Credentials, Endpoint,
    FileTokenStore, MemoryTokenStore, SessionClient, TokenStore,
};

pub use views::{Screen, View, ViewController, ViewSlot, ViewState};

pub use config::{Config, ConfigError, LoggingConfig};
