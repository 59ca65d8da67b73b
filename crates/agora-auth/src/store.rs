//! Where the client keeps its session and durable state.
//!
//! - [`SessionStore`]: the current [`AuthenticatedSession`], process-local
//! - [`KeyValueStore`]: small string values that survive restarts, such as
//!   `currentSchoolId`

use agora_core::ClientError;
use agora_models::AuthenticatedSession;
use arc_swap::ArcSwapOption;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Key under which the active school of the signed-in user is persisted.
pub const CURRENT_SCHOOL_ID_KEY: &str = "currentSchoolId";

/// Holder of the authenticated session.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<Arc<AuthenticatedSession>>;

    /// Replaces any previous session wholesale.
    fn set(&self, session: AuthenticatedSession);

    fn clear(&self);
}

/// Lock-free in-memory [`SessionStore`].
#[derive(Default)]
pub struct InMemorySessionStore {
    session: ArcSwapOption<AuthenticatedSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self) -> Option<Arc<AuthenticatedSession>> {
        self.session.load_full()
    }

    fn set(&self, session: AuthenticatedSession) {
        self.session.store(Some(Arc::new(session)));
    }

    fn clear(&self) {
        self.session.store(None);
    }
}

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// [`KeyValueStore`] that forgets everything when dropped. Used in tests and
/// when no state file is configured.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// [`KeyValueStore`] backed by a JSON object on disk.
///
/// Every write replaces the file through a sibling temporary file and a
/// rename, so a reader never sees a half-written map.
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(ClientError::storage),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ClientError::storage(e)),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ClientError::storage)?;
        }
        let json = serde_json::to_vec_pretty(values).map_err(ClientError::storage)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(ClientError::storage)?;
        fs::rename(&tmp, &self.path).map_err(ClientError::storage)?;
        debug!(path = %self.path.display(), "State file written");
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.load()?;
        f(&mut values);
        self.save(&values)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.update(|values| {
            values.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}
