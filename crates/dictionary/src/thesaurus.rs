//! Synonym and antonym lookups against the thesaurus provider, with a
//! time-bounded in-memory cache in front of it.

use std::{
    collections::HashMap,
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{
    config::DictionaryConfig,
    transport::{HttpRequest, Transport},
    DictionaryError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Synonym,
    Antonym,
}

impl Relation {
    /// Relation code understood by the thesaurus endpoint.
    fn code(self) -> &'static str {
        match self {
            Self::Synonym => "syn",
            Self::Antonym => "ant",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synonym => write!(f, "synonym"),
            Self::Antonym => write!(f, "antonym"),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedRelation {
    words: Vec<String>,
    inserted_at: Instant,
}

impl CachedRelation {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

type CacheKey = (Relation, String);

/// Related-word lists keyed by relation and lowercased word.
///
/// Stale entries are never swept, a read treats them as missing and the next
/// insert overwrites them. With a capacity set, inserting a new key into a full
/// cache first drops stale entries and then, if still full, the oldest one.
pub struct RelationCache {
    ttl: Duration,
    capacity: Option<usize>,
    entries: RwLock<HashMap<CacheKey, CachedRelation>>,
}

impl RelationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            capacity: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub async fn get(&self, relation: Relation, word: &str) -> Option<Vec<String>> {
        let entries = self.entries.read().await;
        entries
            .get(&(relation, word.to_lowercase()))
            .filter(|cached| cached.is_fresh(self.ttl))
            .map(|cached| cached.words.clone())
    }

    pub async fn insert(&self, relation: Relation, word: &str, words: Vec<String>) {
        if self.capacity == Some(0) {
            return;
        }
        let key = (relation, word.to_lowercase());
        let mut entries = self.entries.write().await;
        if let Some(capacity) = self.capacity {
            if !entries.contains_key(&key) && entries.len() >= capacity {
                let ttl = self.ttl;
                entries.retain(|_, cached| cached.is_fresh(ttl));
                if entries.len() >= capacity {
                    let oldest = entries
                        .iter()
                        .min_by_key(|(_, cached)| cached.inserted_at)
                        .map(|(key, _)| key.clone());
                    if let Some(oldest) = oldest {
                        entries.remove(&oldest);
                    }
                }
            }
        }
        entries.insert(
            key,
            CachedRelation {
                words,
                inserted_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Deserialize)]
struct RelatedWord {
    word: String,
}

/// Client for the thesaurus provider. Lookups never fail: any problem is
/// logged and yields an empty list, which is not cached.
pub struct Thesaurus {
    transport: Arc<dyn Transport>,
    base_url: String,
    limit: usize,
    cache: RelationCache,
}

impl Thesaurus {
    pub fn new(transport: Arc<dyn Transport>, config: &DictionaryConfig) -> Self {
        let mut cache = RelationCache::new(config.relation_cache_ttl);
        if let Some(capacity) = config.relation_cache_capacity {
            cache = cache.with_capacity(capacity);
        }
        Self {
            transport,
            base_url: config.thesaurus_url.clone(),
            limit: config.relation_limit,
            cache,
        }
    }

    pub fn cache(&self) -> &RelationCache {
        &self.cache
    }

    pub async fn get(&self, word: &str, relation: Relation) -> Vec<String> {
        if let Some(words) = self.cache.get(relation, word).await {
            tracing::debug!(word, %relation, "related words served from cache");
            return words;
        }
        match self.fetch(word, relation).await {
            Ok(words) => {
                self.cache.insert(relation, word, words.clone()).await;
                words
            }
            Err(error) => {
                tracing::warn!(word, %relation, %error, "related word lookup failed");
                Vec::new()
            }
        }
    }

    /// Synonyms and antonyms of `word`, fetched concurrently.
    pub async fn related(&self, word: &str) -> (Vec<String>, Vec<String>) {
        futures::join!(
            self.get(word, Relation::Synonym),
            self.get(word, Relation::Antonym)
        )
    }

    async fn fetch(&self, word: &str, relation: Relation) -> Result<Vec<String>, DictionaryError> {
        let req = HttpRequest::get(&self.base_url).query(&format!("rel_{}", relation.code()), word);
        let res = self.transport.get(req).await?;
        if res.status != 200 {
            return Err(DictionaryError::Upstream {
                status: Some(res.status),
                message: "thesaurus request rejected".to_string(),
            });
        }
        // The provider ranks by score already.
        let related: Vec<RelatedWord> = serde_json::from_str(&res.body)?;
        Ok(related
            .into_iter()
            .take(self.limit)
            .map(|related| related.word)
            .collect())
    }
}
