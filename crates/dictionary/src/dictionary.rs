use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A dictionary entry in the shape every provider is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub phonetics: Vec<Phonetic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub meanings: Vec<WordMeaning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phonetic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMeaning {
    pub part_of_speech: String,
    pub definitions: Vec<WordDefinition>,
}

/// Only the first definition of a meaning carries synonyms and antonyms,
/// the rest get empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDefinition {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Every example of the sense, present only when examples were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeOptions {
    pub example: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOptions {
    pub include: IncludeOptions,
}

impl LookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_examples(mut self) -> Self {
        self.include.example = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub word: String,
    pub language: String,
    pub options: LookupOptions,
}

impl LookupRequest {
    pub fn new(word: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            language: language.into(),
            options: LookupOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.options = options;
        self
    }
}

/// The older output shape: meanings keyed by part of speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyWord {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub phonetics: Vec<Phonetic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub meaning: BTreeMap<String, Vec<WordDefinition>>,
}

/// Reshapes entries into the legacy shape. When two meanings share a part of
/// speech the later one replaces the earlier one.
pub fn transform_v2_to_v1(words: &[Word]) -> Vec<LegacyWord> {
    words
        .iter()
        .map(|word| {
            let mut meaning = BTreeMap::new();
            for word_meaning in &word.meanings {
                meaning.insert(
                    word_meaning.part_of_speech.clone(),
                    word_meaning.definitions.clone(),
                );
            }
            LegacyWord {
                word: word.word.clone(),
                phonetic: word.phonetic.clone(),
                phonetics: word.phonetics.clone(),
                origin: word.origin.clone(),
                meaning,
            }
        })
        .collect()
}
