/*!
 * Session identity and cache namespace models.
 *
 * A session names one overlay target (historically the id of the process
 * whose window is being translated). It scopes one config file and one
 * cache store per language pair and provider.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::InputError;

/// Longest accepted session identifier
const MAX_SESSION_ID_LEN: usize = 64;

/// Identifier of one logical overlay target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate an identifier; it ends up in file names so only
    /// ASCII letters, digits, `-` and `_` are accepted
    pub fn new(id: impl Into<String>) -> Result<Self, InputError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.len() <= MAX_SESSION_ID_LEN
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(id))
        } else {
            Err(InputError::InvalidSession(id))
        }
    }

    /// Session named after a process id, formatted as 16 uppercase hex digits
    pub fn from_pid(pid: u64) -> Self {
        Self(format!("{:016X}", pid))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for SessionId {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// One cache store: (session, source language, destination language, provider)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheNamespace {
    /// Owning session
    pub session: SessionId,
    /// Canonical source language code
    pub src_lang: String,
    /// Canonical destination language code
    pub dest_lang: String,
    /// Provider identifier
    pub provider: String,
}

impl CacheNamespace {
    pub fn new(
        session: SessionId,
        src_lang: impl Into<String>,
        dest_lang: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            session,
            src_lang: src_lang.into().to_lowercase(),
            dest_lang: dest_lang.into().to_lowercase(),
            provider: provider.into().to_lowercase(),
        }
    }

    /// File name of the store inside the session's cache directory
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}.sqlite3", self.src_lang, self.dest_lang, self.provider)
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}->{}@{}",
            self.session, self.src_lang, self.dest_lang, self.provider
        )
    }
}
