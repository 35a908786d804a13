//! Signed-in session and its on-disk persistence.
//!
//! # Design
//! A `Session` is an ordinary value handed to whoever needs the token; there
//! is no global auth state. `SessionStore` loads it once at start-up and
//! saves it after login, register or logout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::{AuthResponse, UserResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl From<&UserResponse> for User {
    fn from(u: &UserResponse) -> Self {
        Self {
            id: u.user_id.clone(),
            name: u.name.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn from_auth(auth: &AuthResponse) -> Self {
        Self {
            access_token: Some(auth.access_token.clone()),
            user: Some(User::from(&auth.user_response)),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn logout(&mut self) {
        self.access_token = None;
        self.user = None;
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON file holding one `Session`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file loads as an empty session. A stored user that no longer
    /// parses is dropped; the token is kept.
    pub fn load(&self) -> Result<Session, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Session::default()),
            Err(source) => return Err(self.io_error(source)),
        };

        let value: serde_json::Value = serde_json::from_str(&raw).map_err(|source| SessionError::Json {
            path: self.path.clone(),
            source,
        })?;

        let access_token = value
            .get("access_token")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let user = match value.get("user") {
            None | Some(serde_json::Value::Null) => None,
            Some(stored) => match serde_json::from_value::<User>(stored.clone()) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "discarding unreadable stored user");
                    None
                }
            },
        };

        Ok(Session { access_token, user })
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(session).map_err(|source| SessionError::Json {
            path: self.path.clone(),
            source,
        })?;
        self.write_private(raw.as_bytes())
            .map_err(|source| self.io_error(source))
    }

    /// The file holds a bearer token, so it is readable by the owner only.
    fn write_private(&self, contents: &[u8]) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            options.mode(0o600);
            let mut file = options.open(&self.path)?;
            // `mode` only applies on creation; tighten files left by older runs.
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(contents)
        }
        #[cfg(not(unix))]
        {
            options.open(&self.path)?.write_all(contents)
        }
    }

    /// Remove the stored session. A missing file is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
