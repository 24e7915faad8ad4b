use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:4000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout_secs: u64,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Display name of the signed-in user; `None` means signed out
    pub user_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
            user_name: None,
        }
    }
}

impl Settings {
    /// Load `.env` (if any) and read `PLACE_BOOKER_*` variables
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout_secs = match non_empty("PLACE_BOOKER_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PLACE_BOOKER_TIMEOUT_SECS is not a number: {}", raw))?,
            None => defaults.timeout_secs,
        };

        Ok(Self {
            api_url: non_empty("PLACE_BOOKER_API_URL").unwrap_or(defaults.api_url),
            timeout_secs,
            token: non_empty("PLACE_BOOKER_TOKEN"),
            user_name: non_empty("PLACE_BOOKER_USER"),
        })
    }
}
