use chrono::NaiveDate;
use tracing::info;

use crate::{
    auth::{
        handlers::AuthState,
        session::{FileSessionStore, SessionStore},
    },
    config::Config,
    error::AppResult,
    store::RecordStore,
    utils::{roster::Directory, seed},
};

/// Everything the application reads and writes, passed by reference to the
/// operations that need it.
#[derive(Debug)]
pub struct AppState<S> {
    pub config: Config,
    pub directory: Directory,
    pub records: RecordStore,
    pub auth: AuthState<S>,
}

impl<S: SessionStore> AppState<S> {
    pub fn new(config: Config, directory: Directory, records: RecordStore, store: S) -> Self {
        let auth = AuthState::new(store, config.login_delay);
        Self {
            config,
            directory,
            records,
            auth,
        }
    }

    /// Demo directory plus synthetic records for the `seed_days` days ending
    /// at `today` (inclusive), with any stored session restored.
    pub fn bootstrap(config: Config, store: S, today: NaiveDate) -> AppResult<Self> {
        let directory = Directory::demo();
        let records = seed::seeded_records(directory.students(), today, config.seed_days, config.seed)
            .into_iter()
            .collect();

        let mut state = Self::new(config, directory, records, store);
        state.auth.restore()?;

        info!(
            users = state.directory.len(),
            records = state.records.len(),
            authenticated = state.auth.is_authenticated(),
            "Application state ready"
        );
        Ok(state)
    }
}

impl AppState<FileSessionStore> {
    pub fn from_config(config: Config, today: NaiveDate) -> AppResult<Self> {
        let store = FileSessionStore::new(&config.session_dir, &config.session_key);
        Self::bootstrap(config, store, today)
    }
}
