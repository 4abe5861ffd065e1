use std::sync::Arc;

use reqwest::Url;
use serde::Deserialize;

use crate::{
    candidates::candidates,
    config::DictionaryConfig,
    transport::{HttpRequest, Transport},
    DictionaryError,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiktionarySection {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<WiktionaryDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WiktionaryDefinition {
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Sections found for one candidate, and the candidate that matched.
#[derive(Debug, Clone)]
pub struct WiktionaryMatch {
    pub sections: Vec<WiktionarySection>,
    pub matched_word: String,
}

pub struct WiktionaryApi {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl WiktionaryApi {
    pub fn new(transport: Arc<dyn Transport>, config: &DictionaryConfig) -> Self {
        Self {
            transport,
            base_url: config.wiktionary_url.clone(),
        }
    }

    /// Tries every case variant of `word` in order. Failures on one candidate
    /// are logged and the next one is tried; `None` once all are exhausted.
    pub async fn query(&self, word: &str, language: &str) -> Option<WiktionaryMatch> {
        for candidate in candidates(word) {
            match self.query_candidate(&candidate, language).await {
                Ok(Some(sections)) => {
                    return Some(WiktionaryMatch {
                        sections,
                        matched_word: candidate,
                    })
                }
                Ok(None) => {
                    tracing::debug!(candidate = %candidate, language, "no definitions for candidate");
                }
                Err(error) => {
                    tracing::warn!(candidate = %candidate, language, %error, "failed to fetch candidate");
                }
            }
        }
        None
    }

    async fn query_candidate(
        &self,
        candidate: &str,
        language: &str,
    ) -> Result<Option<Vec<WiktionarySection>>, DictionaryError> {
        let res = self.transport.get(HttpRequest::get(self.page_url(candidate)?)).await?;
        if res.status != 200 {
            return Ok(None);
        }
        // Sections of other languages are never decoded.
        let mut languages: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&res.body)?;
        match languages.remove(language) {
            Some(sections) => Ok(Some(serde_json::from_value(sections)?)),
            None => Ok(None),
        }
    }

    fn page_url(&self, candidate: &str) -> Result<String, DictionaryError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|error| DictionaryError::Config(format!("{}: {error}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| DictionaryError::Config(format!("{} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(candidate);
        Ok(url.into())
    }
}
