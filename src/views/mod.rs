//! Console Views
//!
//! The presentation side of the admin console: screen selection, one
//! fetch-and-render unit per view, and plain-text renderers for the
//! payloads the backend returns.

mod controller;
pub mod render;
mod state;

pub use controller::{
    login_error_message, resource_error_message, Screen, View, ViewController,
    LOGIN_FALLBACK_MESSAGE,
};
pub use state::{Ticket, ViewSlot, ViewState};
