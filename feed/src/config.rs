//! Feed client configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `FEED_*` environment variables, and config
//! files. Every field except `author_id` carries a default, so the client
//! starts with no configuration at all.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{AuthorId, DEFAULT_CURVE, DEFAULT_MAX_OFFSET, IndentCurve, UserId};

const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
const DEFAULT_WS_URL: &str = "ws://localhost:8080";
const DEFAULT_USER_ID: &str = "user";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_AUTOMATED_HANDLE: &str = "gemini";

/// Configuration errors detected when settings are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedSettingsError {
    /// A URL setting could not be parsed.
    #[error("invalid {field} URL {value:?}: {message}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Raw configured value.
        value: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Settings for the feed client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FEED")]
pub struct FeedSettings {
    /// Base URL of the REST API.
    #[ortho_config(default = DEFAULT_API_BASE.to_owned())]
    pub api_base: String,
    /// Live-update WebSocket endpoint.
    #[ortho_config(default = DEFAULT_WS_URL.to_owned())]
    pub ws_url: String,
    /// User on whose behalf likes are recorded.
    #[ortho_config(default = DEFAULT_USER_ID.to_owned())]
    pub user_id: String,
    /// Author id used for new posts and replies.
    pub author_id: Option<String>,
    /// Timeout for REST calls, in seconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
    /// Upper bound of the reply indentation curve.
    #[ortho_config(default = DEFAULT_MAX_OFFSET)]
    pub indent_max_offset: f64,
    /// Steepness of the reply indentation curve.
    #[ortho_config(default = DEFAULT_CURVE)]
    pub indent_curve: f64,
    /// Author handles rendered as automated participants.
    #[ortho_config(
        default = vec![DEFAULT_AUTOMATED_HANDLE.to_owned()],
        merge_strategy = "replace"
    )]
    pub automated_handles: Vec<String>,
}

impl FeedSettings {
    /// Base URL of the REST API.
    ///
    /// # Errors
    ///
    /// Returns [`FeedSettingsError::InvalidUrl`] when the value is not a URL.
    pub fn api_base(&self) -> Result<Url, FeedSettingsError> {
        parse_url("api_base", &self.api_base)
    }

    /// Live-update WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`FeedSettingsError::InvalidUrl`] when the value is not a URL.
    pub fn ws_url(&self) -> Result<Url, FeedSettingsError> {
        parse_url("ws_url", &self.ws_url)
    }

    /// Current user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from(self.user_id.as_str())
    }

    /// Configured author id, if any.
    #[must_use]
    pub fn author_id(&self) -> Option<AuthorId> {
        self.author_id.as_deref().map(AuthorId::from)
    }

    /// Timeout applied to REST calls, never shorter than one second.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Reply indentation curve.
    #[must_use]
    pub fn indent_curve(&self) -> IndentCurve {
        IndentCurve::new(self.indent_max_offset, self.indent_curve)
    }

    /// Author handles treated as automated participants, blanks removed.
    #[must_use]
    pub fn automated_handles(&self) -> Vec<String> {
        self.automated_handles
            .iter()
            .map(|handle| handle.trim())
            .filter(|handle| !handle.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, FeedSettingsError> {
    Url::parse(value).map_err(|error| FeedSettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for feed configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 8] = [
        "FEED_API_BASE",
        "FEED_WS_URL",
        "FEED_USER_ID",
        "FEED_AUTHOR_ID",
        "FEED_REQUEST_TIMEOUT_SECS",
        "FEED_INDENT_MAX_OFFSET",
        "FEED_INDENT_CURVE",
        "FEED_AUTOMATED_HANDLES",
    ];

    fn load_from_empty_args() -> FeedSettings {
        FeedSettings::load_from_iter([OsString::from("feed")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base().expect("api base").as_str(),
            "http://localhost:8080/api"
        );
        assert_eq!(
            settings.ws_url().expect("ws url").as_str(),
            "ws://localhost:8080/"
        );
        assert_eq!(settings.user_id().as_str(), "user");
        assert!(settings.author_id().is_none());
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.indent_curve(), IndentCurve::default());
        assert_eq!(settings.automated_handles(), vec!["gemini".to_owned()]);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FEED_API_BASE", Some("https://feed.example/api".to_owned())),
            ("FEED_WS_URL", Some("wss://feed.example/live".to_owned())),
            ("FEED_USER_ID", Some("u-42".to_owned())),
            ("FEED_AUTHOR_ID", Some("68a6ea1b9030bcf69c3c965b".to_owned())),
            ("FEED_REQUEST_TIMEOUT_SECS", Some("3".to_owned())),
            ("FEED_INDENT_MAX_OFFSET", None::<String>),
            ("FEED_INDENT_CURVE", None::<String>),
            ("FEED_AUTOMATED_HANDLES", Some("gemini,helper".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base().expect("api base").as_str(),
            "https://feed.example/api"
        );
        assert_eq!(
            settings.automated_handles(),
            vec!["gemini".to_owned(), "helper".to_owned()]
        );
        assert_eq!(
            settings.ws_url().expect("ws url").as_str(),
            "wss://feed.example/live"
        );
        assert_eq!(settings.user_id().as_str(), "u-42");
        assert_eq!(
            settings.author_id().map(|id| id.to_string()).as_deref(),
            Some("68a6ea1b9030bcf69c3c965b")
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
    }

    #[rstest]
    fn invalid_urls_are_reported() {
        let _guard = lock_env([
            ("FEED_API_BASE", Some("not a url".to_owned())),
            ("FEED_WS_URL", None::<String>),
        ]);

        let settings = load_from_empty_args();
        let error = settings.api_base().expect_err("invalid url");
        assert!(matches!(
            error,
            FeedSettingsError::InvalidUrl { field: "api_base", .. }
        ));
    }
}
