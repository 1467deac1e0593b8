pub mod auth;
pub mod chat;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod qr;
pub mod store;
pub mod subscription;
pub mod utils;
pub mod views;

use std::sync::Arc;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

pub use auth::{AuthProvider, AuthUser, LocalAuth, Session};
pub use config::Config;
pub use db::Database;
pub use error::{ChatError, ChatResult, ValidationError};
pub use store::Store;

/// Process-wide handles created at startup
pub struct App {
    pub store: Arc<Database>,
    pub auth: Arc<LocalAuth>,
    _log_guard: Option<WorkerGuard>,
}

impl App {
    /// Session for whoever is signed in, with their profile created on first use
    pub async fn session(&self) -> ChatResult<Session<Database>> {
        let session = Session::from_auth(self.auth.as_ref(), self.store.clone())?;
        session.ensure_profile().await?;
        Ok(session)
    }
}

/// Initialise logging and open the database
pub fn bootstrap(config: &Config) -> ChatResult<App> {
    let log_guard = logging::init(config)?;
    let store = Database::open(&config.database_path)?;
    info!(path = %config.database_path.display(), "IAC Chat ready");

    Ok(App {
        store: Arc::new(store),
        auth: Arc::new(LocalAuth::new()),
        _log_guard: log_guard,
    })
}
