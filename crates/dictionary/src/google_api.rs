//! Primary provider: the search engine's dictionary feature callback.
//!
//! The request shape is undocumented and depends on an opaque token, so the
//! adapter is best-effort. Everything provider specific, including its error
//! strings, stays in this module.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    config::DictionaryConfig,
    transport::{HttpRequest, Transport},
    DictionaryError, NotFoundError,
};

/// Non-JSON guard the provider puts in front of every payload.
const RESPONSE_PREFIX: &str = ")]}'";
const TERM_NOT_FOUND: &str = "TERM_NOT_FOUND_ERROR";

#[derive(Debug, Deserialize)]
struct CallbackResponse {
    #[serde(rename = "feature-callback")]
    feature_callback: FeatureCallback,
}

#[derive(Debug, Deserialize)]
struct FeatureCallback {
    payload: CallbackPayload,
}

#[derive(Debug, Deserialize)]
struct CallbackPayload {
    #[serde(default)]
    single_results: Vec<SingleResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SingleResult {
    #[serde(default)]
    pub entry: Option<Entry>,
    #[serde(default)]
    pub widget: Option<Widget>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetics: Option<Vec<GooglePhonetic>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<Etymology>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_families: Option<Vec<SenseFamily>>,
    /// Some subentries carry a single family instead of a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_family: Option<SenseFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subentries: Option<Vec<Entry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GooglePhonetic {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub oxford_audio: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Etymology {
    #[serde(default)]
    pub etymology: Option<TextField>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextField {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenseFamily {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts_of_speech: Option<Vec<PartOfSpeechValue>>,
    #[serde(default)]
    pub senses: Vec<Sense>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartOfSpeechValue {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub definition: Option<TextField>,
    #[serde(default)]
    pub example_groups: Vec<ExampleGroup>,
    #[serde(default)]
    pub thesaurus_entries: Vec<ThesaurusEntry>,
    #[serde(default)]
    pub parts_of_speech: Vec<PartOfSpeechValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExampleGroup {
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThesaurusEntry {
    #[serde(default)]
    pub synonyms: Vec<NymGroup>,
    #[serde(default)]
    pub antonyms: Vec<NymGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NymGroup {
    #[serde(default)]
    pub nyms: Vec<Nym>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nym {
    pub nym: String,
}

pub struct GoogleApi {
    transport: Arc<dyn Transport>,
    url: String,
    token: Option<String>,
}

impl GoogleApi {
    pub fn new(transport: Arc<dyn Transport>, config: &DictionaryConfig) -> Self {
        Self {
            transport,
            url: config.google_callback_url.clone(),
            token: config.google_callback_token.clone(),
        }
    }

    pub async fn query(
        &self,
        word: &str,
        language: &str,
    ) -> Result<Vec<SingleResult>, DictionaryError> {
        let Some(token) = &self.token else {
            return Err(DictionaryError::Upstream {
                status: None,
                message: "feature callback token is not configured".to_string(),
            });
        };
        let req = HttpRequest::get(&self.url)
            .query("fc", token.clone())
            .query("fcv", "3")
            .query(
                "async",
                format!(
                    "term:{word},corpus:{language},hhdr:true,hwdgt:true,wfp:true,ttl:,tsl:,ptl:"
                ),
            );
        let res = self.transport.get(req).await?;
        match res.status {
            200 => {}
            404 => return Err(not_found(word, language, "provider answered 404")),
            429 => return Err(DictionaryError::RateLimited),
            status => {
                return Err(DictionaryError::Upstream {
                    status: Some(status),
                    message: "dictionary callback rejected".to_string(),
                })
            }
        }
        parse_results(word, language, &res.body)
    }
}

fn parse_results(
    word: &str,
    language: &str,
    body: &str,
) -> Result<Vec<SingleResult>, DictionaryError> {
    let json = body.strip_prefix(RESPONSE_PREFIX).unwrap_or(body);
    let response: CallbackResponse = serde_json::from_str(json)?;
    let results = response.feature_callback.payload.single_results;
    if results.is_empty() {
        return Err(not_found(word, language, "no results"));
    }
    for result in &results {
        match result.widget.as_ref().and_then(|widget| widget.error.as_deref()) {
            Some(TERM_NOT_FOUND) => return Err(not_found(word, language, "term not found")),
            Some(error) => {
                return Err(DictionaryError::Upstream {
                    status: Some(200),
                    message: error.to_string(),
                })
            }
            None => {}
        }
    }
    Ok(results)
}

fn not_found(word: &str, language: &str, reason: &str) -> DictionaryError {
    DictionaryError::NotFound(NotFoundError::new(word, language, reason))
}
