use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the episode catalog produced by the preprocessing step
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Image search API key; enrichment is disabled without it
    #[serde(default)]
    pub image_search_api_key: Option<String>,

    /// Image search engine identifier (the `cx` parameter)
    #[serde(default)]
    pub image_search_engine_id: Option<String>,

    /// Image search API base URL
    #[serde(default = "default_image_search_api_url")]
    pub image_search_api_url: String,

    /// Upper bound for a single image lookup, in milliseconds
    #[serde(default = "default_image_lookup_timeout_ms")]
    pub image_lookup_timeout_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/imdb_data.csv".to_string()
}

fn default_image_search_api_url() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_image_lookup_timeout_ms() -> u64 {
    2000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Image search credentials, if both halves are configured
    pub fn image_search_credentials(&self) -> Option<(String, String)> {
        match (&self.image_search_api_key, &self.image_search_engine_id) {
            (Some(key), Some(cx)) if !key.is_empty() && !cx.is_empty() => {
                Some((key.clone(), cx.clone()))
            }
            _ => None,
        }
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
