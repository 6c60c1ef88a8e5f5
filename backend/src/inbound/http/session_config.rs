//! Session cookie settings read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning. Release
//! builds refuse to start unless every toggle is present and valid and a
//! real key file is mounted.

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::{info, warn};
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const DEFAULT_KEY_PATH: &str = "/var/run/secrets/library_session_key";
const MIN_KEY_LEN: usize = 64;
// `Key::derive_from` panics below this.
const MIN_DERIVE_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// How strictly missing or malformed toggles are treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching the current compilation profile.
    ///
    /// ```rust
    /// use library_backend::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) {
    ///     BuildMode::Debug
    /// } else {
    ///     BuildMode::Release
    /// };
    /// assert_eq!(BuildMode::current(), expected);
    /// ```
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn lenient(self) -> bool {
        self == Self::Debug
    }
}

/// Resolved cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
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
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Resolve session settings for `mode`.
///
/// ```rust
/// use library_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_ALLOW_EPHEMERAL" => Some("1".to_owned()),
///     "SESSION_KEY_FILE" => Some("/nonexistent/key".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_toggle(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = bool_toggle(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.lenient() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(env, mode, allow_ephemeral)?;
    info!(
        fingerprint = %key_fingerprint(&key),
        cookie_secure,
        same_site = ?same_site,
        "session settings resolved"
    );
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Short SHA-256 fingerprint of the signing half of `key`, safe to log.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..8])
}

/// Lenient modes substitute `default`; strict modes propagate the error.
fn fallback<T>(
    mode: BuildMode,
    default: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.lenient() {
        warn!(%error, "using default session setting");
        Ok(default)
    } else {
        Err(error)
    }
}

fn bool_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return fallback(mode, default, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => fallback(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.lenient() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return fallback(mode, default, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => fallback(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => fallback(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
    );
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if mode.lenient() || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "generating ephemeral session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };
    let length = bytes.len();
    let min_len = if mode.lenient() {
        MIN_DERIVE_LEN
    } else {
        MIN_KEY_LEN
    };
    if length < min_len {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[fixture]
    fn key_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp key file");
        file.write_all(&[b'k'; MIN_KEY_LEN]).expect("write key");
        file
    }

    fn env_with(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn release_env(key: &NamedTempFile, overrides: &[(&'static str, &str)]) -> MockEnv {
        let path = key.path().to_string_lossy().into_owned();
        let mut vars: Vec<(&str, &str)> = vec![
            (KEY_FILE_ENV, path.as_str()),
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ];
        for (name, value) in overrides {
            vars.retain(|(existing, _)| existing != name);
            vars.push((*name, *value));
        }
        env_with(&vars)
    }

    #[rstest]
    fn release_accepts_complete_configuration(key_file: NamedTempFile) {
        let env = release_env(&key_file, &[]);
        let settings =
            session_settings_from_env(&env, BuildMode::Release).expect("valid release config");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV)]
    #[case(SAMESITE_ENV)]
    #[case(ALLOW_EPHEMERAL_ENV)]
    fn release_requires_every_toggle(key_file: NamedTempFile, #[case] missing: &'static str) {
        let path = key_file.path().to_string_lossy().into_owned();
        let vars: Vec<(&str, &str)> = [
            (KEY_FILE_ENV, path.as_str()),
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]
        .into_iter()
        .filter(|(name, _)| *name != missing)
        .collect();
        let env = env_with(&vars);

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("missing toggle rejected");
        assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV, "maybe")]
    #[case(SAMESITE_ENV, "sideways")]
    fn release_rejects_malformed_values(
        key_file: NamedTempFile,
        #[case] name: &'static str,
        #[case] value: &str,
    ) {
        let env = release_env(&key_file, &[(name, value)]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("malformed toggle rejected");
        assert!(matches!(err, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
    }

    #[rstest]
    fn release_rejects_insecure_same_site_none(key_file: NamedTempFile) {
        let env = release_env(&key_file, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("None without Secure rejected");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    fn release_rejects_ephemeral_keys(key_file: NamedTempFile) {
        let env = release_env(&key_file, &[(ALLOW_EPHEMERAL_ENV, "yes")]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("ephemeral rejected");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let mut short = NamedTempFile::new().expect("temp key file");
        short.write_all(b"short").expect("write key");
        let env = release_env(&short, &[]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("short key rejected");
        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 5, .. }));
    }

    #[rstest]
    fn debug_tolerates_an_empty_environment() {
        let env = env_with(&[(KEY_FILE_ENV, "/nonexistent/library/key")]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn same_key_file_gives_same_fingerprint(key_file: NamedTempFile) {
        let first = session_settings_from_env(&release_env(&key_file, &[]), BuildMode::Release)
            .expect("first load");
        let second = session_settings_from_env(&release_env(&key_file, &[]), BuildMode::Release)
            .expect("second load");
        let fingerprint = key_fingerprint(&first.key);
        assert_eq!(fingerprint, key_fingerprint(&second.key));
        assert_eq!(fingerprint.len(), 16);
    }

    #[rstest]
    #[case("TRUE", Some(true))]
    #[case(" n ", Some(false))]
    #[case("2", None)]
    fn parses_boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }
}
