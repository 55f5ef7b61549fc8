//! Session cookie configuration.
//!
//! Turns the `TRAVEL_SESSION_*` settings into a signing key and cookie
//! attributes. Release builds insist on explicit, safe values; debug builds
//! fill gaps with defaults and log a warning for each.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key file length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_VAR: &str = "TRAVEL_SESSION_COOKIE_SECURE";
const SAME_SITE_VAR: &str = "TRAVEL_SESSION_SAME_SITE";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: Option<PathBuf>,
    pub cookie_secure: Option<bool>,
    pub same_site: Option<String>,
    pub allow_ephemeral: Option<bool>,
}

impl From<&AppSettings> for SessionToggles {
    fn from(settings: &AppSettings) -> Self {
        Self {
            key_file: settings.session_key_file.clone(),
            cookie_secure: settings.session_cookie_secure,
            same_site: settings.session_same_site.clone(),
            allow_ephemeral: settings.session_allow_ephemeral,
        }
    }
}

/// Validated session settings.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid value for TRAVEL_SESSION_SAME_SITE='{value}'; expected Strict|Lax|None")]
    InvalidSameSite { value: String },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("TRAVEL_SESSION_SAME_SITE=None requires TRAVEL_SESSION_COOKIE_SECURE=true")]
    InsecureSameSiteNone,
    #[error("TRAVEL_SESSION_ALLOW_EPHEMERAL must be false in release builds")]
    EphemeralNotAllowed,
}

/// Validate the toggles for the given build mode.
///
/// # Examples
///
/// ```
/// use travel_backend::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// let toggles = SessionToggles {
///     key_file: Some("/nonexistent/session_key".into()),
///     ..SessionToggles::default()
/// };
/// let settings = session_settings(&toggles, BuildMode::Debug).expect("debug tolerates gaps");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = cookie_secure(toggles, mode)?;
    let same_site = same_site(toggles, mode, cookie_secure)?;
    let allow_ephemeral = allow_ephemeral(toggles, mode)?;
    let path = toggles
        .key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
    let key = session_key(&path, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn cookie_secure(toggles: &SessionToggles, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match toggles.cookie_secure {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!("{COOKIE_SECURE_VAR} not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::Missing {
            name: COOKIE_SECURE_VAR,
        }),
    }
}

fn same_site(
    toggles: &SessionToggles,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = toggles.same_site.as_deref() else {
        if mode.is_debug() {
            return Ok(SameSite::Lax);
        }
        return Err(SessionConfigError::Missing {
            name: SAME_SITE_VAR,
        });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without a secure cookie; browsers may drop the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value, "invalid {SAME_SITE_VAR}; using Lax");
            Ok(SameSite::Lax)
        }
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
        }),
    }
}

fn allow_ephemeral(toggles: &SessionToggles, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match (toggles.allow_ephemeral, mode) {
        (Some(true), BuildMode::Release) => Err(SessionConfigError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(flag),
        (None, _) => Ok(false),
    }
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
