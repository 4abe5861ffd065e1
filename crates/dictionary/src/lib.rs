use std::{fmt, sync::Arc};

mod candidates;
mod config;
mod dictionary;
mod google_api;
mod google_transform;
mod provider;
mod thesaurus;
mod transport;
mod wiktionary_api;
mod wiktionary_transform;

pub use candidates::candidates;
pub use config::DictionaryConfig;
pub use dictionary::{
    transform_v2_to_v1, IncludeOptions, LegacyWord, LookupOptions, LookupRequest, Phonetic, Word,
    WordDefinition, WordMeaning,
};
pub use google_api::GoogleApi;
pub use provider::{DefinitionProvider, GoogleProvider, WiktionaryProvider};
pub use thesaurus::{Relation, RelationCache, Thesaurus};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use wiktionary_api::{WiktionaryApi, WiktionaryMatch};

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("request failed: {0}")]
    Fetch(String),
    #[error("unexpected response body: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error(transparent)]
    NotFound(NotFoundError),
    #[error("rate limited by provider")]
    RateLimited,
    #[error("provider error{}: {message}", .status.map(|status| format!(" {status}")).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },
    #[error("no definitions found for '{word}' ({language})")]
    NoDefinitionsFound { word: String, language: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    pub word: String,
    pub language: String,
    pub reason: String,
}

impl NotFoundError {
    pub fn new(word: &str, language: &str, reason: &str) -> Self {
        Self {
            word: word.to_string(),
            language: language.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({}) not found: {}", self.word, self.language, self.reason)
    }
}

impl std::error::Error for NotFoundError {}

/// Resolves words by asking each provider in priority order and returning the
/// first non-empty answer.
pub struct Dictionary {
    providers: Vec<Box<dyn DefinitionProvider>>,
}

impl Dictionary {
    /// A dictionary over the default providers, configured from the environment.
    pub fn new() -> Result<Self, DictionaryError> {
        Self::from_config(DictionaryConfig::from_env())
    }

    pub fn from_config(config: DictionaryConfig) -> Result<Self, DictionaryError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: DictionaryConfig, transport: Arc<dyn Transport>) -> Self {
        let thesaurus = Arc::new(Thesaurus::new(transport.clone(), &config));
        let primary: Box<dyn DefinitionProvider> =
            Box::new(GoogleProvider::new(GoogleApi::new(transport.clone(), &config)));
        let fallback: Box<dyn DefinitionProvider> = Box::new(WiktionaryProvider::new(
            WiktionaryApi::new(transport, &config),
            thesaurus,
        ));
        Self::with_providers(vec![primary, fallback])
    }

    pub fn with_providers(providers: Vec<Box<dyn DefinitionProvider>>) -> Self {
        Self { providers }
    }

    pub async fn find_definitions(
        &self,
        word: &str,
        language: &str,
        options: LookupOptions,
    ) -> Result<Vec<Word>, DictionaryError> {
        for provider in &self.providers {
            match provider.lookup(word, language, &options).await {
                Ok(words) if !words.is_empty() => {
                    tracing::info!(word, language, provider = provider.name(), "resolved definitions");
                    return Ok(words);
                }
                Ok(_) => {
                    tracing::warn!(word, language, provider = provider.name(), "provider returned no usable entries");
                }
                Err(error) => {
                    tracing::warn!(word, language, provider = provider.name(), %error, "provider failed");
                }
            }
        }
        Err(DictionaryError::NoDefinitionsFound {
            word: word.to_string(),
            language: language.to_string(),
        })
    }

    pub async fn lookup(&self, request: &LookupRequest) -> Result<Vec<Word>, DictionaryError> {
        self.find_definitions(&request.word, &request.language, request.options)
            .await
    }

    /// First English entry for `word`.
    pub async fn get_definition(&self, word: &str) -> Result<Word, DictionaryError> {
        self.find_definitions(word, "en", LookupOptions::default())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DictionaryError::NoDefinitionsFound {
                word: word.to_string(),
                language: "en".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    enum Outcome {
        Words(&'static str),
        Empty,
        Fail,
    }

    struct FixedProvider {
        outcome: Outcome,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DefinitionProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn lookup(
            &self,
            _word: &str,
            language: &str,
            _options: &LookupOptions,
        ) -> Result<Vec<Word>, DictionaryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Words(word) => Ok(vec![Word {
                    word: word.to_string(),
                    phonetic: None,
                    phonetics: vec![],
                    origin: None,
                    meanings: vec![WordMeaning {
                        part_of_speech: "noun".to_string(),
                        definitions: vec![WordDefinition {
                            definition: format!("definition of {word}"),
                            example: None,
                            examples: None,
                            synonyms: vec![],
                            antonyms: vec![],
                        }],
                    }],
                }]),
                Outcome::Empty => Ok(vec![]),
                Outcome::Fail => Err(DictionaryError::NotFound(NotFoundError::new(
                    "w", language, "fixed",
                ))),
            }
        }
    }

    fn provider(outcome: Outcome) -> (Box<dyn DefinitionProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(FixedProvider {
                outcome,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    #[tokio::test]
    async fn first_success_stops_the_chain() {
        let (first, first_calls) = provider(Outcome::Words("primary"));
        let (second, second_calls) = provider(Outcome::Words("fallback"));
        let dictionary = Dictionary::with_providers(vec![first, second]);

        let words = dictionary
            .find_definitions("x", "en", LookupOptions::default())
            .await
            .unwrap();
        assert_eq!(words[0].word, "primary");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_and_empty_answers_fall_through() {
        let (failing, _) = provider(Outcome::Fail);
        let (empty, _) = provider(Outcome::Empty);
        let (last, _) = provider(Outcome::Words("fallback"));
        let dictionary = Dictionary::with_providers(vec![failing, empty, last]);

        let words = dictionary
            .lookup(&LookupRequest::new("x", "en"))
            .await
            .unwrap();
        assert_eq!(words[0].word, "fallback");
    }

    #[tokio::test]
    async fn exhausting_every_provider_is_no_definitions_found() {
        let (failing, _) = provider(Outcome::Fail);
        let (empty, _) = provider(Outcome::Empty);
        let dictionary = Dictionary::with_providers(vec![failing, empty]);

        match dictionary.get_definition("zzqx").await {
            Err(DictionaryError::NoDefinitionsFound { word, language }) => {
                assert_eq!(word, "zzqx");
                assert_eq!(language, "en");
            }
            other => panic!("expected NoDefinitionsFound, got {other:?}"),
        }
    }

    #[test]
    fn error_messages_read_well() {
        let upstream = DictionaryError::Upstream {
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(upstream.to_string(), "provider error 500: boom");

        let not_found = DictionaryError::NotFound(NotFoundError::new("zzqx", "en", "no results"));
        assert_eq!(not_found.to_string(), "'zzqx' (en) not found: no results");
    }
}
