//! Durable storage for the session token.
//!
//! Exactly one opaque string is persisted, under [`TOKEN_STORAGE_KEY`]. Only
//! the [`SessionManager`](crate::session::SessionManager) writes it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::config::{self, TOKEN_STORAGE_KEY};
use crate::error::{CollectionError, Result};

pub trait TokenStore: Send {
    /// The persisted token, or `None` when nothing usable is stored.
    fn load(&self) -> Result<Option<String>>;

    fn save(&mut self, token: &str) -> Result<()>;

    /// Remove the persisted token. Clearing an empty store succeeds.
    fn clear(&mut self) -> Result<()>;
}

impl<S: TokenStore + ?Sized> TokenStore for Box<S> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&mut self, token: &str) -> Result<()> {
        (**self).save(token)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Keeps the token in a file named after the storage key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    ///
    /// If `data_dir` is `None`, uses the platform-appropriate data directory.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.join(TOKEN_STORAGE_KEY),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file in the same directory and rename it over the
    /// target, so an interrupted save never leaves a partial token behind.
    fn save(&mut self, token: &str) -> Result<()> {
        let dir = self.path.parent().ok_or_else(|| {
            CollectionError::InvalidArgument(format!(
                "token path {} has no parent directory",
                self.path.display()
            ))
        })?;
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(token.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| CollectionError::Io(e.error))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// In-process store. Clones share one slot, so a caller can keep a handle and
/// observe what the session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, as if persisted by an earlier run.
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| CollectionError::Internal("token store lock poisoned".into()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&mut self, token: &str) -> Result<()> {
        *self.lock()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
