//! Rule source configuration.
//!
//! [`RuleSourceConfig`] is the loose, serde-friendly form read from host
//! settings or the command line. [`RuleSourceConfig::validate`] turns it into
//! an immutable [`RuleSource`] that a build borrows.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::analysis::synonym::ParseOptions;
use crate::error::{Result, SynonymError};

pub const DEFAULT_INDEX: &str = ".synonyms";
pub const DEFAULT_USERNAME: &str = "elastic";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9200;
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_MAX_DOCUMENTS: usize = 10_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for loading rules from a remote index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSourceConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub index: String,
    /// Read rules from this field only. All fields are read when unset.
    pub field: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub expand: bool,
    pub dedup: bool,
    pub lenient: bool,
    pub timeout_secs: u64,
    pub max_documents: usize,
}

impl Default for RuleSourceConfig {
    fn default() -> Self {
        RuleSourceConfig {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            index: DEFAULT_INDEX.to_string(),
            field: None,
            username: None,
            password: None,
            expand: true,
            dedup: true,
            lenient: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_documents: DEFAULT_MAX_DOCUMENTS,
        }
    }
}

impl RuleSourceConfig {
    /// Read a config from flat host settings.
    ///
    /// Recognised keys are `index`, `field`, `username`, `password`,
    /// `expand`, `dedup`, `lenient`, `network.host`, `http.port` and
    /// `http.scheme`. Other keys are ignored.
    pub fn from_settings<I, K, V>(settings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = RuleSourceConfig::default();

        for (key, value) in settings {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "index" => config.index = value.to_string(),
                "field" => config.field = Some(value.to_string()),
                "username" => config.username = Some(value.to_string()),
                "password" => config.password = Some(value.to_string()),
                "expand" => config.expand = parse_bool(key, value)?,
                "dedup" => config.dedup = parse_bool(key, value)?,
                "lenient" => config.lenient = parse_bool(key, value)?,
                "network.host" => config.host = value.to_string(),
                "http.port" => {
                    config.port = value.trim().parse().map_err(|_| {
                        SynonymError::invalid_config(format!(
                            "Setting [http.port] must be a port number, got [{value}]"
                        ))
                    })?
                }
                "http.scheme" => config.scheme = value.to_string(),
                _ => {}
            }
        }

        Ok(config)
    }

    /// Rule interpretation policy carried by this config.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            expand: self.expand,
            dedup: self.dedup,
            lenient: self.lenient,
        }
    }

    /// Check the settings and produce an immutable [`RuleSource`].
    pub fn validate(&self) -> Result<RuleSource> {
        let scheme = self.scheme.trim();
        if scheme != "http" && scheme != "https" {
            return Err(SynonymError::invalid_config(format!(
                "Unsupported scheme [{scheme}], expected http or https"
            )));
        }
        let host = self.host.trim();
        if host.is_empty() {
            return Err(SynonymError::invalid_config("Host must not be blank"));
        }
        if self.port == 0 {
            return Err(SynonymError::invalid_config("Port must not be 0"));
        }
        let index = self.index.trim();
        if index.is_empty() {
            return Err(SynonymError::invalid_config("Index name must not be blank"));
        }
        let field = match self.field.as_deref().map(str::trim) {
            Some("") => {
                return Err(SynonymError::invalid_config(
                    "Field name must not be blank when set",
                ));
            }
            field => field.map(str::to_string),
        };
        if self.timeout_secs == 0 {
            return Err(SynonymError::invalid_config("Timeout must be positive"));
        }
        if self.max_documents == 0 {
            return Err(SynonymError::invalid_config(
                "Maximum document count must be positive",
            ));
        }

        let base_url = Url::parse(&format!("{scheme}://{host}:{}/", self.port)).map_err(|e| {
            SynonymError::invalid_config(format!("Invalid address [{host}:{}]: {e}", self.port))
        })?;

        let credentials = match self.password.as_deref() {
            Some(password) if !password.trim().is_empty() => {
                let username = self
                    .username
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .unwrap_or(DEFAULT_USERNAME);
                Some(Credentials {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            _ => None,
        };

        Ok(RuleSource {
            base_url,
            index: index.to_string(),
            field,
            credentials,
            options: self.parse_options(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_documents: self.max_documents,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(SynonymError::invalid_config(format!(
            "Setting [{key}] must be true or false, got [{other}]"
        ))),
    }
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Validated location and policy of a rule index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    base_url: Url,
    index: String,
    field: Option<String>,
    credentials: Option<Credentials>,
    options: ParseOptions,
    timeout: Duration,
    max_documents: usize,
}

impl RuleSource {
    /// `scheme://host:port/` of the document store.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_documents(&self) -> usize {
        self.max_documents
    }

    /// URL of `segments` below the base URL, each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SynonymError::invalid_config(format!("Cannot use [{}] as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RuleSourceConfig::default();
        assert_eq!(config.index, ".synonyms");
        assert_eq!(config.port, 9200);
        assert!(config.expand);
        assert!(config.dedup);
        assert!(!config.lenient);

        let source = config.validate().unwrap();
        assert_eq!(source.base_url().as_str(), "http://localhost:9200/");
        assert!(source.field().is_none());
        assert!(source.credentials().is_none());
        assert_eq!(source.max_documents(), DEFAULT_MAX_DOCUMENTS);
    }

    #[test]
    fn test_from_settings() {
        let settings = HashMap::from([
            ("index", "my_synonyms"),
            ("field", "rules"),
            ("password", "secret"),
            ("lenient", "true"),
            ("expand", "false"),
            ("network.host", "search.local"),
            ("http.port", "9300"),
            ("http.scheme", "https"),
            ("type", "index_synonym_graph"),
        ]);

        let config = RuleSourceConfig::from_settings(settings).unwrap();
        assert!(config.lenient);
        assert!(!config.expand);
        assert!(config.dedup);

        let source = config.validate().unwrap();
        assert_eq!(source.index(), "my_synonyms");
        assert_eq!(source.field(), Some("rules"));
        assert_eq!(source.base_url().as_str(), "https://search.local:9300/");
        let credentials = source.credentials().unwrap();
        assert_eq!(credentials.username, "elastic");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn test_invalid_boolean_setting() {
        let result = RuleSourceConfig::from_settings([("lenient", "yes")]);
        assert!(matches!(result, Err(SynonymError::InvalidConfiguration(_))));

        let result = RuleSourceConfig::from_settings([("http.port", "ninety")]);
        assert!(matches!(result, Err(SynonymError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let blank_index = RuleSourceConfig {
            index: "  ".to_string(),
            ..RuleSourceConfig::default()
        };
        assert!(blank_index.validate().is_err());

        let blank_field = RuleSourceConfig {
            field: Some(String::new()),
            ..RuleSourceConfig::default()
        };
        assert!(blank_field.validate().is_err());

        let blank_host = RuleSourceConfig {
            host: String::new(),
            ..RuleSourceConfig::default()
        };
        assert!(blank_host.validate().is_err());

        let zero_port = RuleSourceConfig {
            port: 0,
            ..RuleSourceConfig::default()
        };
        assert!(zero_port.validate().is_err());

        let bad_scheme = RuleSourceConfig {
            scheme: "ftp".to_string(),
            ..RuleSourceConfig::default()
        };
        assert!(bad_scheme.validate().is_err());
    }

    #[test]
    fn test_blank_password_disables_auth() {
        let config = RuleSourceConfig {
            username: Some("admin".to_string()),
            password: Some("   ".to_string()),
            ..RuleSourceConfig::default()
        };
        assert!(config.validate().unwrap().credentials().is_none());

        let config = RuleSourceConfig {
            username: Some("admin".to_string()),
            password: Some("pw".to_string()),
            ..RuleSourceConfig::default()
        };
        let source = config.validate().unwrap();
        assert_eq!(source.credentials().unwrap().username, "admin");
        assert!(!format!("{source:?}").contains("pw\""));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let source = RuleSourceConfig::default().validate().unwrap();
        assert_eq!(
            source.endpoint(&[".synonyms"]).unwrap().as_str(),
            "http://localhost:9200/.synonyms"
        );
        assert_eq!(
            source.endpoint(&["my index", "_search"]).unwrap().as_str(),
            "http://localhost:9200/my%20index/_search"
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: RuleSourceConfig =
            serde_json::from_str(r#"{ "index": "rules", "lenient": true }"#).unwrap();
        assert_eq!(config.index, "rules");
        assert!(config.lenient);
        assert_eq!(config.host, DEFAULT_HOST);
    }
}
