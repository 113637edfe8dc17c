//! Application-level configuration loading: streaming-provider endpoints,
//! OAuth client settings, and an optional seed token for session restore.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TUNE_TRIVIA_BACK_CONFIG_PATH";

/// Environment override for the OAuth client identifier.
const CLIENT_ID_ENV: &str = "TUNE_TRIVIA_CLIENT_ID";
/// Environment override for the OAuth redirect URI.
const REDIRECT_URI_ENV: &str = "TUNE_TRIVIA_REDIRECT_URI";
/// Optional bearer token installed at startup so a restarted process can
/// resume an existing provider session.
const ACCESS_TOKEN_ENV: &str = "TUNE_TRIVIA_ACCESS_TOKEN";

const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SCOPES: &str = "user-read-private user-read-email playlist-read-private playlist-read-collaborative user-modify-playback-state";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    client_id: String,
    redirect_uri: String,
    authorize_url: String,
    token_url: String,
    api_base_url: String,
    scopes: String,
    seed_access_token: Option<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in provider defaults, then apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded provider configuration");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Some(client_id) = non_empty_env(CLIENT_ID_ENV) {
            config.client_id = client_id;
        }
        if let Some(redirect_uri) = non_empty_env(REDIRECT_URI_ENV) {
            config.redirect_uri = redirect_uri;
        }
        if let Some(token) = non_empty_env(ACCESS_TOKEN_ENV) {
            config.seed_access_token = Some(token);
        }

        if config.client_id.is_empty() {
            warn!("no OAuth client id configured; login attempts will be rejected upstream");
        }

        config
    }

    /// OAuth client identifier registered with the provider.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Redirect URI the provider sends the authorization code back to.
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Provider authorize endpoint the login redirect points at.
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    /// Provider token endpoint used for the code exchange.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Base URL of the provider's catalog/playback REST surface.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Space-separated OAuth scopes requested at login.
    pub fn scopes(&self) -> &str {
        &self.scopes
    }

    /// Bearer token to install at startup, when resuming a session.
    pub fn seed_access_token(&self) -> Option<&str> {
        self.seed_access_token.as_deref()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            redirect_uri: String::new(),
            authorize_url: DEFAULT_AUTHORIZE_URL.into(),
            token_url: DEFAULT_TOKEN_URL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            scopes: DEFAULT_SCOPES.into(),
            seed_access_token: None,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    redirect_uri: Option<String>,
    #[serde(default)]
    authorize_url: Option<String>,
    #[serde(default)]
    token_url: Option<String>,
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    scopes: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            client_id: value.client_id.unwrap_or(defaults.client_id),
            redirect_uri: value.redirect_uri.unwrap_or(defaults.redirect_uri),
            authorize_url: value.authorize_url.unwrap_or(defaults.authorize_url),
            token_url: value.token_url.unwrap_or(defaults.token_url),
            api_base_url: value.api_base_url.unwrap_or(defaults.api_base_url),
            scopes: value.scopes.unwrap_or(defaults.scopes),
            seed_access_token: value.access_token,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read an environment variable, treating empty values as unset.
fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
