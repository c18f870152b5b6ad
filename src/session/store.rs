//! Durable token storage
//!
//! The session token survives restarts in a single storage entry. Absence of
//! the entry is the canonical "logged out" state at startup.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

/// Fixed storage key for the session token
pub const TOKEN_KEY: &str = "admin-token";

/// Durable storage for the session token.
///
/// Implementations hold at most one token. `clear` succeeds when nothing is
/// stored.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token verbatim, `None` when absent or empty
    async fn load(&self) -> std::io::Result<Option<String>>;

    /// Replace the stored token
    async fn save(&self, token: &str) -> std::io::Result<()>;

    /// Remove the stored token
    async fn clear(&self) -> std::io::Result<()>;
}

/// Token store backed by a single file containing the raw token string
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store named [`TOKEN_KEY`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKEN_KEY))
    }

    /// Get the path to the token file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> std::io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path).await?;

        // A pre-existing file keeps its old mode on open; tighten it before
        // the token lands on disk.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }

        file.write_all(token.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = ?self.path, "Session token persisted");
        Ok(())
    }

    async fn clear(&self) -> std::io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = ?self.path, "Session token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory token store, for tests and embedders without a filesystem
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Current stored value, bypassing the async trait
    pub fn get(&self) -> Option<String> {
        self.token.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn set(&self, value: Option<String>) -> std::io::Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| std::io::Error::new(ErrorKind::Other, e.to_string()))?;
        *guard = value;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> std::io::Result<Option<String>> {
        Ok(self.get().filter(|t| !t.is_empty()))
    }

    async fn save(&self, token: &str) -> std::io::Result<()> {
        self.set(Some(token.to_string()))
    }

    async fn clear(&self) -> std::io::Result<()> {
        self.set(None)
    }
}
