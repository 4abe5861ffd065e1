use std::sync::LazyLock;

use regex::Regex;

use crate::{
    dictionary::{LookupOptions, Word, WordDefinition, WordMeaning},
    thesaurus::Thesaurus,
    wiktionary_api::{WiktionaryDefinition, WiktionarySection},
};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Builds a single [`Word`] for `matched_word`. Synonyms and antonyms come from
/// the thesaurus and go on the first definition of every meaning only.
pub async fn transform(
    thesaurus: &Thesaurus,
    matched_word: &str,
    sections: Vec<WiktionarySection>,
    options: &LookupOptions,
) -> Vec<Word> {
    let (synonyms, antonyms) = thesaurus.related(matched_word).await;

    let meanings: Vec<WordMeaning> = sections
        .into_iter()
        .filter_map(|section| build_meaning(section, &synonyms, &antonyms, options))
        .collect();
    if meanings.is_empty() {
        return Vec::new();
    }
    vec![Word {
        word: matched_word.to_string(),
        phonetic: Some(String::new()),
        phonetics: Vec::new(),
        origin: Some(String::new()),
        meanings,
    }]
}

fn build_meaning(
    section: WiktionarySection,
    synonyms: &[String],
    antonyms: &[String],
    options: &LookupOptions,
) -> Option<WordMeaning> {
    let definitions: Vec<WordDefinition> = section
        .definitions
        .into_iter()
        .filter_map(|raw| build_definition(raw, options))
        .enumerate()
        .map(|(index, mut definition)| {
            if index == 0 {
                definition.synonyms = synonyms.to_vec();
                definition.antonyms = antonyms.to_vec();
            }
            definition
        })
        .collect();
    if definitions.is_empty() {
        return None;
    }
    Some(WordMeaning {
        part_of_speech: section.part_of_speech.to_lowercase(),
        definitions,
    })
}

fn build_definition(raw: WiktionaryDefinition, options: &LookupOptions) -> Option<WordDefinition> {
    let definition = strip_markup(&raw.definition);
    if definition.is_empty() {
        return None;
    }
    let examples: Vec<String> = raw
        .examples
        .iter()
        .map(|example| strip_markup(example))
        .filter(|example| !example.is_empty())
        .collect();
    Some(WordDefinition {
        definition,
        example: Some(examples.first().cloned().unwrap_or_default()),
        examples: options.include.example.then_some(examples),
        synonyms: Vec::new(),
        antonyms: Vec::new(),
    })
}

/// Removes inline HTML tags and decodes the common character entities.
fn strip_markup(text: &str) -> String {
    TAG.replace_all(text, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::DictionaryConfig,
        transport::{testing::StubTransport, HttpResponse},
        DictionaryError,
    };

    fn section(part_of_speech: &str, definitions: Vec<(&str, Vec<&str>)>) -> WiktionarySection {
        WiktionarySection {
            part_of_speech: part_of_speech.to_string(),
            definitions: definitions
                .into_iter()
                .map(|(definition, examples)| WiktionaryDefinition {
                    definition: definition.to_string(),
                    examples: examples.iter().map(|example| example.to_string()).collect(),
                })
                .collect(),
        }
    }

    fn thesaurus(transport: Arc<StubTransport>) -> Thesaurus {
        Thesaurus::new(transport, &DictionaryConfig::default())
    }

    fn related_stub() -> Arc<StubTransport> {
        Arc::new(StubTransport::new(|request| {
            let body = if request.query_value("rel_syn").is_some() {
                r#"[{"word": "sprint"}, {"word": "dash"}]"#
            } else {
                r#"[{"word": "walk"}]"#
            };
            Ok(HttpResponse::new(200, body))
        }))
    }

    #[tokio::test]
    async fn builds_one_word_with_lowercased_sections() {
        let transport = related_stub();
        let thesaurus = thesaurus(transport.clone());
        let words = transform(
            &thesaurus,
            "run",
            vec![
                section(
                    "VERB",
                    vec![("to move fast", vec!["he can run"]), ("to operate", vec![])],
                ),
                section("Noun", vec![("an act of running", vec![])]),
            ],
            &LookupOptions::default(),
        )
        .await;

        assert_eq!(words.len(), 1);
        let word = &words[0];
        assert_eq!(word.word, "run");
        assert_eq!(word.phonetic.as_deref(), Some(""));
        assert!(word.phonetics.is_empty());
        assert_eq!(word.origin.as_deref(), Some(""));
        assert_eq!(word.meanings.len(), 2);

        let verb = &word.meanings[0];
        assert_eq!(verb.part_of_speech, "verb");
        assert_eq!(verb.definitions[0].example.as_deref(), Some("he can run"));
        assert_eq!(verb.definitions[0].synonyms, vec!["sprint", "dash"]);
        assert_eq!(verb.definitions[0].antonyms, vec!["walk"]);
        assert_eq!(verb.definitions[1].example.as_deref(), Some(""));
        assert!(verb.definitions[1].synonyms.is_empty());
        assert!(verb.definitions[1].antonyms.is_empty());

        let noun = &word.meanings[1];
        assert_eq!(noun.part_of_speech, "noun");
        assert_eq!(noun.definitions[0].synonyms, vec!["sprint", "dash"]);

        assert_eq!(transport.calls(), 2);
        assert!(verb.definitions[0].examples.is_none());
    }

    #[tokio::test]
    async fn attaches_every_example_when_requested() {
        let words = transform(
            &thesaurus(related_stub()),
            "run",
            vec![section(
                "Verb",
                vec![
                    ("to move fast", vec!["he can <i>run</i>", "<br/>", "run, run"]),
                    ("to operate", vec![]),
                ],
            )],
            &LookupOptions::new().with_examples(),
        )
        .await;

        let definitions = &words[0].meanings[0].definitions;
        assert_eq!(definitions[0].example.as_deref(), Some("he can run"));
        assert_eq!(
            definitions[0].examples,
            Some(vec!["he can run".to_string(), "run, run".to_string()])
        );
        assert_eq!(definitions[1].example.as_deref(), Some(""));
        assert_eq!(definitions[1].examples, Some(vec![]));
    }

    #[tokio::test]
    async fn strips_markup_and_drops_empty_definitions() {
        let words = transform(
            &thesaurus(related_stub()),
            "cat",
            vec![
                section(
                    "Noun",
                    vec![
                        ("<span></span>", vec![]),
                        (
                            "A <a href=\"/wiki/mammal\">mammal</a> &amp; pet",
                            vec!["The <b>cat</b> sat."],
                        ),
                    ],
                ),
                section("Verb", vec![("  <br/> ", vec![])]),
            ],
            &LookupOptions::default(),
        )
        .await;

        assert_eq!(words[0].meanings.len(), 1);
        let definitions = &words[0].meanings[0].definitions;
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].definition, "A mammal & pet");
        assert_eq!(definitions[0].example.as_deref(), Some("The cat sat."));
        assert_eq!(definitions[0].synonyms, vec!["sprint", "dash"]);
    }

    #[tokio::test]
    async fn nothing_usable_gives_no_words() {
        let transport = Arc::new(StubTransport::new(|_| {
            Err(DictionaryError::Fetch("offline".to_string()))
        }));
        let words = transform(
            &thesaurus(transport),
            "x",
            vec![section("Noun", vec![])],
            &LookupOptions::default(),
        )
        .await;
        assert!(words.is_empty());
    }
}
