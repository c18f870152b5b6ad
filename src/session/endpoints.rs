//! Backend endpoint table
//!
//! The admin backend exposes a fixed set of REST paths under its base URL.

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "https://bnh6zvyh59.execute-api.us-east-2.amazonaws.com/dev";

/// Admin backend endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Auth,
    Stats,
    Appointments,
    Centers,
    Specialties,
    Medics,
}

impl Endpoint {
    /// Path relative to the base URL
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Auth => "/admin/auth",
            Endpoint::Stats => "/admin/stats",
            Endpoint::Appointments => "/admin/appointments",
            Endpoint::Centers => "/admin/centers",
            Endpoint::Specialties => "/admin/specialties",
            Endpoint::Medics => "/admin/medics",
        }
    }

    /// Whether calls to this endpoint carry the bearer token
    pub fn requires_auth(self) -> bool {
        !matches!(self, Endpoint::Auth)
    }

    /// Join this endpoint onto a base URL, tolerating a trailing slash
    pub fn url(self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        assert_eq!(
            Endpoint::Stats.url("http://localhost:3000/"),
            "http://localhost:3000/admin/stats"
        );
        assert_eq!(
            Endpoint::Auth.url("http://localhost:3000/dev"),
            "http://localhost:3000/dev/admin/auth"
        );
    }

    #[test]
    fn test_only_auth_is_anonymous() {
        assert!(!Endpoint::Auth.requires_auth());
        assert!(Endpoint::Medics.requires_auth());
        assert!(Endpoint::Specialties.requires_auth());
    }
}
