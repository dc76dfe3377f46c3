//! Credential configuration.
//!
//! Koleo session auth is cookie-based; the cookie pieces live in a local
//! JSON file. A missing or malformed file is not an error: the server
//! starts with empty credentials and auth-required endpoints surface
//! 401/403 from the remote side.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "KOLEO_MCP_CONFIG";

/// Credentials loaded from the config file. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KoleoConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Raw cookie entries, sent verbatim on auth-required requests.
    pub auth: Option<BTreeMap<String, String>>,
}

impl KoleoConfig {
    /// Assemble the session cookie header from the `auth` map.
    ///
    /// Entries with empty values are skipped; an empty result means no
    /// cookie header is sent at all.
    pub fn cookie_header(&self) -> Option<String> {
        let auth = self.auth.as_ref()?;
        let entries: Vec<String> = auth
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key}={value}"))
            .collect();

        if entries.is_empty() {
            None
        } else {
            Some(entries.join("; "))
        }
    }

    /// Whether login credentials (email + password) are present.
    pub fn has_credentials(&self) -> bool {
        matches!((&self.email, &self.password), (Some(e), Some(p)) if !e.is_empty() && !p.is_empty())
    }
}

/// Default config location: `~/.config/koleo-mcp/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("koleo-mcp").join("config.json"))
}

/// Load configuration.
///
/// Resolution order: explicit path, then [`CONFIG_PATH_ENV`], then the
/// default location. Any failure (no file, unreadable, bad JSON) yields
/// an empty config.
pub fn load(path: Option<&Path>) -> KoleoConfig {
    let resolved: Option<PathBuf> = match path {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_path),
    };

    let Some(config_path) = resolved else {
        return KoleoConfig::default();
    };

    match std::fs::read_to_string(&config_path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %config_path.display(), error = %e, "malformed config file; using empty config");
            KoleoConfig::default()
        }),
        Err(_) => KoleoConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_empty_config() {
        let config = load(Some(Path::new("/nonexistent/koleo/config.json")));
        assert!(config.email.is_none());
        assert!(config.password.is_none());
        assert!(config.auth.is_none());
    }

    #[test]
    fn malformed_file_yields_empty_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let config = load(Some(file.path()));
        assert!(config.email.is_none());
        assert!(!config.has_credentials());
    }

    #[test]
    fn loads_credentials_and_auth_map() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"email": "a@b.pl", "password": "secret", "auth": {{"_koleo_session": "abc", "remember": "1"}}}}"#
        )
        .unwrap();

        let config = load(Some(file.path()));
        assert_eq!(config.email.as_deref(), Some("a@b.pl"));
        assert!(config.has_credentials());
        assert_eq!(
            config.cookie_header().unwrap(),
            "_koleo_session=abc; remember=1"
        );
    }

    #[test]
    fn empty_auth_values_omit_cookie() {
        let config = KoleoConfig {
            auth: Some(BTreeMap::from([(String::from("session"), String::new())])),
            ..KoleoConfig::default()
        };
        assert_eq!(config.cookie_header(), None);

        assert_eq!(KoleoConfig::default().cookie_header(), None);
    }

    #[test]
    fn has_credentials_requires_both_fields_nonempty() {
        let mut config = KoleoConfig {
            email: Some("a@b.pl".into()),
            ..KoleoConfig::default()
        };
        assert!(!config.has_credentials());

        config.password = Some(String::new());
        assert!(!config.has_credentials());

        config.password = Some("pw".into());
        assert!(config.has_credentials());
    }
}
