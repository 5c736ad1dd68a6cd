//! Configuration (explicit keys > environment).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Layered configuration.
///
/// API keys set explicitly (e.g. entered at the session prompt) take
/// precedence over keys loaded from the environment. Keys are held in
/// memory only and never written to disk.
#[derive(Debug, Clone, Default)]
pub struct RekonConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
}

impl RekonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables, reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore missing .env
        let config = Self::new();

        for env_var in ["GOOGLE_API_KEY", "GEMINI_API_KEY"] {
            if let Ok(key) = std::env::var(env_var) {
                config.set_api_key("gemini", key);
                break;
            }
        }
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            config.set_base_url("gemini", url);
        }

        config
    }

    pub fn set_api_key(&self, provider: &str, key: String) {
        self.api_keys
            .write()
            .unwrap()
            .insert(provider.to_string(), key);
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.read().unwrap().get(provider).cloned()
    }

    pub fn set_base_url(&self, provider: &str, url: String) {
        self.base_urls
            .write()
            .unwrap()
            .insert(provider.to_string(), url);
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.read().unwrap().get(provider).cloned()
    }

    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }
}
