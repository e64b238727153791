use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::token::{SessionTokens, TokenKind};

/// Storage abstraction for the persisted session.
///
/// Reads never fail: a missing, unreadable, or corrupt backing store reports
/// "no session" rather than an error, so non-interactive environments degrade
/// cleanly. Writes are best-effort; failures are logged and swallowed.
/// [`set`](TokenStore::set) persists both tokens in one call so no other
/// component ever observes a half-written session.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Option<String>;
    fn set(&self, tokens: &SessionTokens);
    fn clear(&self);
}

/// File-backed token store using a single TOML file.
///
/// # Example
/// ```no_run
/// use sigtrace::auth::{FileTokenStore, SessionTokens, TokenKind, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// store.set(&SessionTokens::new("access", "refresh"));
/// assert_eq!(store.get(TokenKind::Access).as_deref(), Some("access"));
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            path: base_dir.join("session.toml"),
        }
    }

    pub fn new_default() -> Self {
        Self::new(default_sigtrace_dir())
    }

    fn read_tokens(&self) -> Option<SessionTokens> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "session file unreadable");
                return None;
            }
        };
        match toml::from_str::<SessionFile>(&raw) {
            Ok(file) => Some(file.tokens),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "session file corrupt; treating as absent");
                None
            }
        }
    }

    fn ensure_parent(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn write_tokens(&self, tokens: &SessionTokens) -> std::io::Result<()> {
        Self::ensure_parent(&self.path)?;
        let file = SessionFile {
            version: 1,
            tokens: tokens.clone(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let tokens = self.read_tokens()?;
        match kind {
            TokenKind::Access => Some(tokens.access),
            TokenKind::Refresh => Some(tokens.refresh),
        }
    }

    fn set(&self, tokens: &SessionTokens) {
        if let Err(err) = self.write_tokens(tokens) {
            warn!(path = %self.path.display(), %err, "failed to persist session");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), %err, "failed to clear session"),
        }
    }
}

/// In-memory token store for tests and embeddings without persistence.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<SessionTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let guard = self.tokens.read().ok()?;
        let tokens = guard.as_ref()?;
        match kind {
            TokenKind::Access => Some(tokens.access.clone()),
            TokenKind::Refresh => Some(tokens.refresh.clone()),
        }
    }

    fn set(&self, tokens: &SessionTokens) {
        if let Ok(mut guard) = self.tokens.write() {
            *guard = Some(tokens.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.tokens.write() {
            *guard = None;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    tokens: SessionTokens,
    saved_at: DateTime<Utc>,
}

fn default_sigtrace_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".sigtrace"))
        .unwrap_or_else(|| PathBuf::from(".sigtrace"))
}
