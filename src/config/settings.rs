//! Settings structures for Agrimarket configuration

use crate::locales::SupportedLanguage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid bind address '{0}'")]
    BindAddress(String),
}

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub i18n: I18nSettings,
    pub routing: RoutingSettings,
    pub catalog: CatalogSettings,
    pub cache: CacheSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Merge with environment variables (STOREFRONT_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("STOREFRONT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("STOREFRONT_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid STOREFRONT_PORT '{}'", val),
            }
        }
        if let Some(val) = var("STOREFRONT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("STOREFRONT_BASE_URL") {
            self.server.base_url = Some(val);
        }
        if let Some(val) = var("STOREFRONT_DEFAULT_LANG") {
            match val.parse() {
                Ok(lang) => self.i18n.default_lang = lang,
                Err(e) => tracing::warn!("Ignoring STOREFRONT_DEFAULT_LANG: {}", e),
            }
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.base_url()?;
        self.server
            .bind_address
            .parse::<std::net::IpAddr>()
            .map_err(|_| SettingsError::BindAddress(self.server.bind_address.clone()))?;
        Ok(())
    }

    /// Public base URL, derived from the bind address when not configured
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = match &self.server.base_url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}/", self.server.bind_address, self.server.port),
        };
        Url::parse(&raw).map_err(|source| SettingsError::BaseUrl { url: raw, source })
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Site name displayed in the UI
    pub site_name: String,
    /// Contact address shown in the footer
    pub contact_email: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            site_name: "Agrimarket".to_string(),
            contact_email: None,
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Public base URL used for canonical and alternate links
    pub base_url: Option<String>,
    /// Public instance mode (allows indexing in robots.txt)
    pub public_instance: bool,
    /// Directory served under /static
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            base_url: None,
            public_instance: false,
            static_dir: None,
        }
    }
}

/// Language settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    /// Fallback language when no signal matches
    pub default_lang: SupportedLanguage,
    /// Cookie holding the last explicit language choice
    pub preference_cookie: String,
    /// Lifetime of the preference cookie in seconds
    pub preference_max_age: u64,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_lang: SupportedLanguage::DEFAULT,
            preference_cookie: "preferred_language".to_string(),
            preference_max_age: 60 * 60 * 24 * 365,
        }
    }
}

/// Slug overrides, keyed by route key then language code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    pub slugs: HashMap<String, HashMap<String, String>>,
}

/// Catalog contents published in the sitemap
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub listing_ids: Vec<String>,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Time to live of the rendered sitemap in seconds
    pub sitemap_ttl_secs: u64,
    /// Maximum number of cached sitemap documents
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            sitemap_ttl_secs: 3600,
            max_capacity: 16,
        }
    }
}
