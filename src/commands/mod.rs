// CLI commands
// One module per command family; main.rs parses arguments and dispatches here

pub mod auth;
pub mod dashboard;
pub mod groups;
pub mod tasks;

use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::output::{BusyIndicator, Format};
use crate::services::{AuthApi, LoadingObserver, SessionClient, TaskApi, TracingObserver};
use crate::session::{FileStore, Session};

/// Shared state handed to every command
#[derive(Clone)]
pub struct AppContext {
    pub client: Arc<SessionClient>,
    pub auth: AuthApi,
    pub tasks: TaskApi,
    pub format: Format,
}

impl AppContext {
    /// Session persisted at `config.session_file`, requests to `config.api_url`
    pub fn from_config(config: &Config, format: Format) -> Result<Self> {
        let store = Arc::new(FileStore::new(config.session_file.clone()));
        tracing::debug!("Session file: {}", store.path().display());
        let session = Arc::new(Session::new(store));
        let observer: Arc<dyn LoadingObserver> = match format {
            Format::Pretty => Arc::new(BusyIndicator::new(format)),
            Format::Json => Arc::new(TracingObserver),
        };
        let client = SessionClient::from_config(config, session)?.with_observer(observer);
        Ok(Self::with_client(Arc::new(client), format))
    }

    pub fn with_client(client: Arc<SessionClient>, format: Format) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            tasks: TaskApi::new(client.clone()),
            client,
            format,
        }
    }

    /// Local calendar day used for due-date buckets and highlighting
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
