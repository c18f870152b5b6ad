//! View Controller
//!
//! Consumer of the [`SessionClient`]. Decides between the credential form
//! and the console, flips screens on login and logout, and runs each view as
//! an isolated fetch-then-render unit.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::render;
use super::state::{ViewSlot, ViewState};
use crate::session::{AdminError, AdminResult, SessionClient};

/// Shown when a login fails without a backend message
pub const LOGIN_FALLBACK_MESSAGE: &str = "Error de autenticación";

/// Console views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Appointments,
    Medics,
    Centers,
    Specialties,
}

impl View {
    /// Menu order
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Appointments,
        View::Medics,
        View::Centers,
        View::Specialties,
    ];

    pub fn id(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Appointments => "appointments",
            View::Medics => "medics",
            View::Centers => "centers",
            View::Specialties => "specialties",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Appointments => "Citas",
            View::Medics => "Médicos",
            View::Centers => "Centros Médicos",
            View::Specialties => "Especialidades",
        }
    }

    /// Whether the view loads a resource when shown.
    ///
    /// Centers and specialties have accessors but no view consumes them yet.
    pub fn fetches(self) -> bool {
        !matches!(self, View::Centers | View::Specialties)
    }

    /// Message shown when the view's fetch fails without a backend message
    pub fn fallback_error(self) -> &'static str {
        match self {
            View::Dashboard => "Error loading stats",
            View::Appointments => "Error loading appointments",
            View::Medics => "Error loading medics",
            View::Centers => "Error loading centers",
            View::Specialties => "Error loading specialties",
        }
    }

    /// Parse a view id
    pub fn from_id(id: &str) -> Option<Self> {
        View::ALL.into_iter().find(|v| v.id() == id)
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Credential form
    Login,
    /// Authenticated layout showing one view
    Console { view: View },
}

/// User-facing message for a failed login: the body's `message` field
pub fn login_error_message(err: &AdminError) -> String {
    err.backend_message()
        .unwrap_or(LOGIN_FALLBACK_MESSAGE)
        .to_string()
}

/// User-facing message for a failed resource fetch: the body's `error` field
pub fn resource_error_message(view: View, err: &AdminError) -> String {
    err.backend_error()
        .unwrap_or(view.fallback_error())
        .to_string()
}

/// Drives screens and views on top of a shared session client.
///
/// All operations take `&self`, so navigation can run while a view's fetch
/// is still in flight.
pub struct ViewController {
    client: Arc<SessionClient>,
    screen: Mutex<Screen>,
    slots: HashMap<View, ViewSlot<Value>>,
}

impl ViewController {
    /// Pick the initial screen from the client's session
    pub async fn start(client: Arc<SessionClient>) -> Self {
        let screen = if client.is_authenticated().await {
            Screen::Console {
                view: View::Dashboard,
            }
        } else {
            Screen::Login
        };

        let slots = View::ALL
            .into_iter()
            .filter(|v| v.fetches())
            .map(|v| (v, ViewSlot::new()))
            .collect();

        Self {
            client,
            screen: Mutex::new(screen),
            slots,
        }
    }

    pub fn screen(&self) -> Screen {
        *self.lock_screen()
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    /// Submit the credential form.
    ///
    /// On success switches to the console's dashboard; on failure stays on
    /// the login screen and returns the message to display.
    pub async fn submit_login(&self, username: &str, password: &str) -> Result<(), String> {
        match self.client.login(username, password).await {
            Ok(_) => {
                if let Some(slot) = self.slots.get(&View::Dashboard) {
                    slot.attach();
                }
                *self.lock_screen() = Screen::Console {
                    view: View::Dashboard,
                };
                Ok(())
            }
            Err(e) => Err(login_error_message(&e)),
        }
    }

    /// Log out and return to the credential form
    pub async fn logout(&self) -> AdminResult<()> {
        let result = self.client.logout().await;
        for slot in self.slots.values() {
            slot.detach();
        }
        *self.lock_screen() = Screen::Login;
        result
    }

    /// Switch the console to `view`, detaching the one being left.
    ///
    /// Ignored on the login screen.
    pub fn navigate(&self, view: View) {
        let mut screen = self.lock_screen();
        if let Screen::Console { view: current } = *screen {
            if current != view {
                if let Some(slot) = self.slots.get(&current) {
                    slot.detach();
                }
            }
            if let Some(slot) = self.slots.get(&view) {
                if !slot.is_attached() {
                    slot.attach();
                }
            }
            *screen = Screen::Console { view };
        }
    }

    /// Fetch the resource behind `view` into its slot.
    ///
    /// Returns the slot state after the fetch. A result that arrives after
    /// the view was left is discarded and the state stays as it was.
    pub async fn load(&self, view: View) -> ViewState<Value> {
        let Some(slot) = self.slots.get(&view) else {
            return ViewState::Loading;
        };

        let client = Arc::clone(&self.client);
        slot.load(async move {
            let result = match view {
                View::Dashboard => client.get_stats().await,
                View::Appointments => client.get_appointments().await,
                View::Medics => client.get_medics().await,
                View::Centers => client.get_centers().await,
                View::Specialties => client.get_specialties().await,
            };
            result.map_err(|e| {
                tracing::warn!(view = view.id(), error = %e, "View fetch failed");
                resource_error_message(view, &e)
            })
        })
        .await;

        if !self.client.is_authenticated().await {
            *self.lock_screen() = Screen::Login;
        }

        slot.state()
    }

    /// Current state of a view's slot
    pub fn state(&self, view: View) -> Option<ViewState<Value>> {
        self.slots.get(&view).map(ViewSlot::state)
    }

    /// Render a view state as text
    pub fn render(view: View, state: &ViewState<Value>) -> String {
        if !view.fetches() {
            return render::render_placeholder(view);
        }

        match state {
            ViewState::Loading => "Cargando...\n".to_string(),
            ViewState::Error(message) => format!("Error: {}\n", message),
            ViewState::Data(payload) => match view {
                View::Dashboard => render::render_dashboard(payload),
                View::Appointments => render::render_appointments(payload),
                View::Medics => render::render_medics(payload),
                View::Centers | View::Specialties => render::render_placeholder(view),
            },
        }
    }

    /// Load and render the current console view
    pub async fn show_current(&self) -> Option<String> {
        let Screen::Console { view } = self.screen() else {
            return None;
        };

        if !view.fetches() {
            return Some(render::render_placeholder(view));
        }

        let state = self.load(view).await;
        Some(Self::render(view, &state))
    }

    fn lock_screen(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(|e| e.into_inner())
    }
}
