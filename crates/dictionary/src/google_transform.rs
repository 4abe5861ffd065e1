//! Reshapes primary provider results into [`Word`]s.
//!
//! The provider's data has a few shapes that are unexpected but not fatal.
//! Those are collected as [`Diagnostic`]s and logged, the transform carries on.

use std::fmt;

use serde::Serialize;

use crate::{
    dictionary::{LookupOptions, Phonetic, Word, WordDefinition, WordMeaning},
    google_api::{Entry, NymGroup, Sense, SenseFamily, SingleResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DiagnosticKind {
    MultipleSubentries,
    SubentriesWithSenseFamilies,
    SubentriesWithEtymology,
    MissingPartOfSpeech,
    MultiplePartsOfSpeech,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleSubentries => write!(f, "More than one subentry"),
            Self::SubentriesWithSenseFamilies => write!(f, "Entry has subentries and sense families"),
            Self::SubentriesWithEtymology => write!(f, "Entry has subentries and etymology"),
            Self::MissingPartOfSpeech => {
                write!(f, "Part of speech missing but more than one sense present")
            }
            Self::MultiplePartsOfSpeech => write!(f, "More than one part of speech present"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Diagnostic {
    pub word: String,
    pub language: String,
    pub kind: DiagnosticKind,
    /// The raw provider data that triggered the diagnostic.
    pub data: serde_json::Value,
}

impl Diagnostic {
    pub fn emit(&self) {
        tracing::warn!(
            target: "dictionary::diagnostics",
            word = %self.word,
            language = %self.language,
            message = %self.kind,
            data = %self.data,
            "unexpected provider data"
        );
    }
}

struct Diagnostics<'a> {
    word: &'a str,
    language: &'a str,
    events: Vec<Diagnostic>,
}

impl<'a> Diagnostics<'a> {
    fn new(word: &'a str, language: &'a str) -> Self {
        Self {
            word,
            language,
            events: Vec::new(),
        }
    }

    fn record<T: Serialize + ?Sized>(&mut self, kind: DiagnosticKind, data: &T) {
        self.events.push(Diagnostic {
            word: self.word.to_string(),
            language: self.language.to_string(),
            kind,
            data: serde_json::to_value(data).unwrap_or_default(),
        });
    }
}

pub fn transform(
    word: &str,
    language: &str,
    results: Vec<SingleResult>,
    options: &LookupOptions,
) -> Vec<Word> {
    let (words, diagnostics) = transform_with_diagnostics(word, language, results, options);
    for diagnostic in &diagnostics {
        diagnostic.emit();
    }
    words
}

/// Same as [`transform`] but hands the diagnostics back instead of logging them.
pub(crate) fn transform_with_diagnostics(
    word: &str,
    language: &str,
    results: Vec<SingleResult>,
    options: &LookupOptions,
) -> (Vec<Word>, Vec<Diagnostic>) {
    let mut diagnostics = Diagnostics::new(word, language);
    let entries = flatten_entries(
        results.into_iter().filter_map(|result| result.entry),
        &mut diagnostics,
    );
    let words = entries
        .into_iter()
        .filter_map(|entry| build_word(entry, options, &mut diagnostics))
        .collect();
    (words, diagnostics.events)
}

/// Replaces every entry that has subentries with those subentries.
fn flatten_entries(
    entries: impl Iterator<Item = Entry>,
    diagnostics: &mut Diagnostics,
) -> Vec<Entry> {
    let mut flattened = Vec::new();
    for mut entry in entries {
        let Some(subentries) = entry.subentries.take() else {
            flattened.push(entry);
            continue;
        };
        if subentries.len() > 1 {
            diagnostics.record(DiagnosticKind::MultipleSubentries, &subentries);
        }
        if entry.sense_families.is_some() {
            diagnostics.record(DiagnosticKind::SubentriesWithSenseFamilies, &entry);
        }
        if entry.etymology.is_some() {
            diagnostics.record(DiagnosticKind::SubentriesWithEtymology, &entry);
        }
        flattened.extend(
            subentries
                .into_iter()
                .map(|subentry| inherit_defaults(subentry, &entry)),
        );
    }
    flattened
}

/// Fills the subentry's missing phonetics and etymology from its parent.
fn inherit_defaults(mut subentry: Entry, parent: &Entry) -> Entry {
    if subentry.phonetics.is_none() {
        subentry.phonetics = parent.phonetics.clone();
    }
    if subentry.etymology.is_none() {
        subentry.etymology = parent.etymology.clone();
    }
    if subentry.sense_families.is_none() {
        subentry.sense_families = subentry.sense_family.take().map(|family| vec![family]);
    }
    subentry
}

fn build_word(entry: Entry, options: &LookupOptions, diagnostics: &mut Diagnostics) -> Option<Word> {
    let word = entry
        .lemma
        .or(entry.headword)
        .unwrap_or_else(|| diagnostics.word.to_string());
    let phonetics = entry.phonetics.unwrap_or_default();
    let phonetic = phonetics.first().and_then(|phonetic| phonetic.text.clone());
    let origin = entry
        .etymology
        .and_then(|etymology| etymology.etymology)
        .and_then(|etymology| etymology.text);
    let meanings: Vec<WordMeaning> = entry
        .sense_families
        .unwrap_or_default()
        .into_iter()
        .filter_map(|family| build_meaning(family, options, diagnostics))
        .collect();
    if meanings.is_empty() {
        return None;
    }
    Some(Word {
        word,
        phonetic,
        phonetics: phonetics
            .into_iter()
            .map(|phonetic| Phonetic {
                text: phonetic.text,
                audio: phonetic.oxford_audio,
            })
            .collect(),
        origin,
        meanings,
    })
}

fn build_meaning(
    family: SenseFamily,
    options: &LookupOptions,
    diagnostics: &mut Diagnostics,
) -> Option<WordMeaning> {
    let parts_of_speech = match family.parts_of_speech {
        Some(parts_of_speech) => parts_of_speech,
        None => {
            if family.senses.len() > 1 {
                diagnostics.record(DiagnosticKind::MissingPartOfSpeech, &family.senses);
            }
            family
                .senses
                .first()
                .map(|sense| sense.parts_of_speech.clone())
                .unwrap_or_default()
        }
    };
    if parts_of_speech.len() > 1 {
        diagnostics.record(DiagnosticKind::MultiplePartsOfSpeech, &parts_of_speech);
    }
    let part_of_speech = parts_of_speech
        .into_iter()
        .next()
        .and_then(|part_of_speech| part_of_speech.value)
        .unwrap_or_default();
    let definitions: Vec<WordDefinition> = family
        .senses
        .into_iter()
        .filter_map(|sense| build_definition(sense, options))
        .collect();
    if definitions.is_empty() {
        return None;
    }
    Some(WordMeaning {
        part_of_speech,
        definitions,
    })
}

fn build_definition(sense: Sense, options: &LookupOptions) -> Option<WordDefinition> {
    let definition = sense
        .definition
        .and_then(|definition| definition.text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())?;
    let example = sense
        .example_groups
        .first()
        .and_then(|group| group.examples.first())
        .cloned();
    let examples = options.include.example.then(|| {
        sense
            .example_groups
            .iter()
            .flat_map(|group| group.examples.iter().cloned())
            .collect()
    });
    let thesaurus = sense.thesaurus_entries.first();
    Some(WordDefinition {
        definition,
        example,
        examples,
        synonyms: thesaurus
            .map(|entry| first_nyms(&entry.synonyms))
            .unwrap_or_default(),
        antonyms: thesaurus
            .map(|entry| first_nyms(&entry.antonyms))
            .unwrap_or_default(),
    })
}

fn first_nyms(groups: &[NymGroup]) -> Vec<String> {
    groups
        .first()
        .map(|group| group.nyms.iter().map(|nym| nym.nym.clone()).collect())
        .unwrap_or_default()
}
