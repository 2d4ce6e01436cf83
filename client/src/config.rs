//! Client configuration loaded via OrthoConfig.
//!
//! Every value can be set through `AUTH_CLIENT_*` environment variables or a
//! configuration file; the accessors supply defaults for anything unset.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_FILE: &str = ".auth-client/session.json";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The API base URL could not be parsed.
    #[error("invalid api_base_url {value:?}: {message}")]
    InvalidBaseUrl {
        /// Value as configured.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The request timeout was zero.
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Settings for the auth client binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AUTH_CLIENT")]
pub struct ClientSettings {
    /// Base URL of the auth API; endpoint paths are joined below it.
    pub api_base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Location of the persisted session file.
    pub session_file: Option<String>,
    /// Answer every request from the built-in offline transport.
    pub offline: Option<bool>,
}

impl ClientSettings {
    /// Parsed API base URL, falling back to the local development server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the configured value is
    /// not an absolute URL.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL);
        Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Request timeout, falling back to thirty seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] when the timeout is zero.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
        {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Session file location, falling back to `.auth-client/session.json`.
    #[must_use]
    pub fn session_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.session_file.as_deref().unwrap_or(DEFAULT_SESSION_FILE))
    }

    /// Whether requests skip the network; off unless configured.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.offline.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("auth-client")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("AUTH_CLIENT_API_BASE_URL", None::<String>),
            ("AUTH_CLIENT_REQUEST_TIMEOUT_SECS", None::<String>),
            ("AUTH_CLIENT_SESSION_FILE", None::<String>),
            ("AUTH_CLIENT_OFFLINE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().expect("default url").as_str(),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            settings.request_timeout(),
            Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        );
        assert_eq!(settings.session_file(), Utf8PathBuf::from(DEFAULT_SESSION_FILE));
        assert!(!settings.is_offline());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "AUTH_CLIENT_API_BASE_URL",
                Some("https://api.example.test/v2/".to_owned()),
            ),
            ("AUTH_CLIENT_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            (
                "AUTH_CLIENT_SESSION_FILE",
                Some("/tmp/auth-client/session.json".to_owned()),
            ),
            ("AUTH_CLIENT_OFFLINE", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().expect("url").as_str(),
            "https://api.example.test/v2/"
        );
        assert_eq!(settings.request_timeout(), Ok(Duration::from_secs(5)));
        assert_eq!(
            settings.session_file(),
            Utf8PathBuf::from("/tmp/auth-client/session.json")
        );
        assert!(settings.is_offline());
    }

    #[rstest]
    #[case("not a url")]
    #[case("/relative/path")]
    fn unparsable_base_urls_are_rejected(#[case] raw: &str) {
        let settings = ClientSettings {
            api_base_url: Some(raw.to_owned()),
            request_timeout_secs: None,
            session_file: None,
            offline: None,
        };
        assert!(matches!(
            settings.api_base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[rstest]
    fn zero_timeouts_are_rejected() {
        let settings = ClientSettings {
            api_base_url: None,
            request_timeout_secs: Some(0),
            session_file: None,
            offline: None,
        };
        assert_eq!(settings.request_timeout(), Err(ConfigError::ZeroTimeout));
    }
}
