use std::time::Duration;

const GOOGLE_CALLBACK_URL: &str = "https://www.google.com/async/callback:5493";
const WIKTIONARY_URL: &str = "https://en.wiktionary.org/api/rest_v1/page/definition";
const THESAURUS_URL: &str = "https://api.datamuse.com/words";

/// Endpoints, HTTP settings and relation cache settings for a [`crate::Dictionary`].
#[derive(Debug, Clone)]
pub struct DictionaryConfig {
    pub google_callback_url: String,
    /// Opaque feature-callback token the primary provider expects. The primary
    /// provider is skipped while this is unset.
    pub google_callback_token: Option<String>,
    pub wiktionary_url: String,
    pub thesaurus_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub relation_cache_ttl: Duration,
    /// Maximum number of cached relation lists, unbounded when `None`.
    pub relation_cache_capacity: Option<usize>,
    /// How many related words are kept per lookup.
    pub relation_limit: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            google_callback_url: GOOGLE_CALLBACK_URL.to_string(),
            google_callback_token: None,
            wiktionary_url: WIKTIONARY_URL.to_string(),
            thesaurus_url: THESAURUS_URL.to_string(),
            user_agent: concat!("rich-vocabulary/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: Duration::from_secs(10),
            relation_cache_ttl: Duration::from_secs(60 * 60),
            relation_cache_capacity: None,
            relation_limit: 5,
        }
    }
}

impl DictionaryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the `DICTIONARY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("DICTIONARY_GOOGLE_URL") {
            config.google_callback_url = url;
        }
        if let Some(token) = lookup("DICTIONARY_GOOGLE_TOKEN").filter(|token| !token.is_empty()) {
            config.google_callback_token = Some(token);
        }
        if let Some(url) = lookup("DICTIONARY_WIKTIONARY_URL") {
            config.wiktionary_url = url;
        }
        if let Some(url) = lookup("DICTIONARY_THESAURUS_URL") {
            config.thesaurus_url = url;
        }
        if let Some(user_agent) = lookup("DICTIONARY_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(secs) = parse_number(&lookup, "DICTIONARY_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_number(&lookup, "DICTIONARY_CACHE_TTL_SECS") {
            config.relation_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(capacity) = parse_number(&lookup, "DICTIONARY_CACHE_CAPACITY") {
            config.relation_cache_capacity = Some(capacity as usize);
        }
        config
    }

    pub fn with_google_token(mut self, token: impl Into<String>) -> Self {
        self.google_callback_token = Some(token.into());
        self
    }

    pub fn with_google_url(mut self, url: impl Into<String>) -> Self {
        self.google_callback_url = url.into();
        self
    }

    pub fn with_wiktionary_url(mut self, url: impl Into<String>) -> Self {
        self.wiktionary_url = url.into();
        self
    }

    pub fn with_thesaurus_url(mut self, url: impl Into<String>) -> Self {
        self.thesaurus_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.relation_cache_ttl = ttl;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.relation_cache_capacity = Some(capacity);
        self
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(number) => Some(number),
        Err(_) => {
            tracing::warn!(key, value = %value, "ignoring unparseable configuration value");
            None
        }
    }
}
