//! Explicitly constructed session context.
//!
//! Holds the API client, the persisted bearer token and the signed-in user.
//! Views receive the shared [`ApiClient`] from here instead of reaching for
//! global state.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::RwLock;

use crate::client::api::ApiClient;
use crate::client::error::Result;
use crate::constants::{APP_DIR_NAME, TOKEN_FILE_NAME};
use crate::models::{AuthResponse, RegisterPayload, User};

/// Persistence for the single bearer-token value.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token kept as the whole content of one file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/cofrinho/token`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Authenticated(User),
    Anonymous,
}

pub struct SessionContext<S: TokenStore> {
    api: ApiClient,
    store: S,
    user: RwLock<Option<User>>,
}

impl<S: TokenStore> SessionContext<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            user: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    /// Restores a persisted session. A token the server no longer accepts
    /// is torn down and the session starts anonymous.
    pub async fn init(&self) -> SessionState {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return SessionState::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted token");
                return SessionState::Anonymous;
            }
        };

        self.api.set_token(token).await;
        match self.api.me().await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "session restored");
                *self.user.write().await = Some(user.clone());
                SessionState::Authenticated(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "persisted token rejected");
                self.teardown().await;
                SessionState::Anonymous
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let response = self.api.login(email, password).await?;
        self.adopt(response).await
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<User> {
        let response = self.api.register(payload).await?;
        self.adopt(response).await
    }

    /// Best-effort server logout followed by local teardown.
    pub async fn logout(&self) {
        if self.api.token().await.is_some() {
            if let Err(e) = self.api.logout().await {
                tracing::warn!(error = %e, "server logout failed");
            }
        }
        self.teardown().await;
    }

    async fn adopt(&self, response: AuthResponse) -> Result<User> {
        self.store.save(&response.token)?;
        self.api.set_token(response.token).await;
        *self.user.write().await = Some(response.user.clone());
        tracing::info!(user_id = response.user.id, "signed in");
        Ok(response.user)
    }

    async fn teardown(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear persisted token");
        }
        self.api.clear_token().await;
        *self.user.write().await = None;
    }
}
