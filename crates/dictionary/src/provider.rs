use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    dictionary::{LookupOptions, Word},
    google_api::GoogleApi,
    google_transform,
    thesaurus::Thesaurus,
    wiktionary_api::WiktionaryApi,
    wiktionary_transform, DictionaryError, NotFoundError,
};

/// One upstream source: queries it and reshapes what it returns into [`Word`]s.
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(
        &self,
        word: &str,
        language: &str,
        options: &LookupOptions,
    ) -> Result<Vec<Word>, DictionaryError>;
}

/// Queried with the word exactly as given, no case variants.
pub struct GoogleProvider {
    api: GoogleApi,
}

impl GoogleProvider {
    pub fn new(api: GoogleApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DefinitionProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn lookup(
        &self,
        word: &str,
        language: &str,
        options: &LookupOptions,
    ) -> Result<Vec<Word>, DictionaryError> {
        let results = self.api.query(word, language).await?;
        Ok(google_transform::transform(word, language, results, options))
    }
}

pub struct WiktionaryProvider {
    api: WiktionaryApi,
    thesaurus: Arc<Thesaurus>,
}

impl WiktionaryProvider {
    pub fn new(api: WiktionaryApi, thesaurus: Arc<Thesaurus>) -> Self {
        Self { api, thesaurus }
    }
}

#[async_trait]
impl DefinitionProvider for WiktionaryProvider {
    fn name(&self) -> &str {
        "wiktionary"
    }

    async fn lookup(
        &self,
        word: &str,
        language: &str,
        options: &LookupOptions,
    ) -> Result<Vec<Word>, DictionaryError> {
        let Some(found) = self.api.query(word, language).await else {
            return Err(DictionaryError::NotFound(NotFoundError::new(
                word,
                language,
                "no candidate matched",
            )));
        };
        Ok(wiktionary_transform::transform(
            &self.thesaurus,
            &found.matched_word,
            found.sections,
            options,
        )
        .await)
    }
}
