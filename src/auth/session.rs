use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppResult;
use crate::model::user::User;

/// Where the logged-in user is kept between runs.
pub trait SessionStore {
    fn load(&self) -> AppResult<Option<User>>;
    fn save(&mut self, user: &User) -> AppResult<()>;
    fn clear(&mut self) -> AppResult<()>;
}

/// Stores the session as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AppResult<Option<User>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, user: &User) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_vec(user)?)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&mut self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Key-value session storage held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    key: String,
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: HashMap::new(),
        }
    }

    /// Raw stored value, as a browser's local storage would hold it.
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(&self.key).map(String::as_str)
    }

    pub fn set_raw(&mut self, value: impl Into<String>) {
        self.entries.insert(self.key.clone(), value.into());
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AppResult<Option<User>> {
        self.raw()
            .map(serde_json::from_str::<User>)
            .transpose()
            .map_err(Into::into)
    }

    fn save(&mut self, user: &User) -> AppResult<()> {
        let raw = serde_json::to_string(user)?;
        self.set_raw(raw);
        Ok(())
    }

    fn clear(&mut self) -> AppResult<()> {
        self.entries.remove(&self.key);
        Ok(())
    }
}
