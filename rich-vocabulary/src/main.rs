use dictionary::{transform_v2_to_v1, Dictionary, DictionaryError, LookupOptions, Word};
use tracing_subscriber::EnvFilter;
use utilities::{input, str_to_bool, Command};

mod utilities;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let dict = Dictionary::new()?;
    let mut language = String::from("en");
    let mut options = LookupOptions::default();
    loop {
        let Some(line) = input(">> ")? else {
            break;
        };
        match Command::parse(&line) {
            None => {}
            Some(Command::Exit) => {
                break;
            }
            Some(Command::Define(word)) => {
                if let Some(words) = lookup(&dict, &word, &language, options).await {
                    for word in &words {
                        print_definition(word);
                    }
                }
            }
            Some(Command::Legacy(word)) => {
                if let Some(words) = lookup(&dict, &word, &language, options).await {
                    println!("{}", serde_json::to_string_pretty(&transform_v2_to_v1(&words))?);
                }
            }
            Some(Command::Language(code)) => {
                println!("Looking up words in '{code}' from now on.");
                language = code;
            }
            Some(Command::Examples(value)) => match str_to_bool(&value) {
                Some(enabled) => {
                    options.include.example = enabled;
                    println!("Examples {}.", if enabled { "on" } else { "off" });
                }
                None => {
                    println!("Expected on or off, got '{value}'.");
                }
            },
            Some(Command::Unknown(command)) => {
                println!("Unknown command {command}. Try define, legacy, language, examples or exit.");
            }
        }
    }
    Ok(())
}

async fn lookup(
    dict: &Dictionary,
    word: &str,
    language: &str,
    options: LookupOptions,
) -> Option<Vec<Word>> {
    if word.is_empty() {
        println!("Which word?");
        return None;
    }
    match dict.find_definitions(word, language, options).await {
        Ok(words) => Some(words),
        Err(DictionaryError::NoDefinitionsFound { .. }) => {
            println!("Couldn't find the word you were looking for.");
            None
        }
        Err(error) => {
            println!("Encountered an error while searching for the word definition: {error}");
            None
        }
    }
}

fn print_definition(word: &Word) {
    match word.phonetic.as_deref().filter(|phonetic| !phonetic.is_empty()) {
        Some(phonetic) => println!("Showing definition for '{}' /{phonetic}/:", word.word),
        None => println!("Showing definition for '{}':", word.word),
    }
    if let Some(origin) = word.origin.as_deref().filter(|origin| !origin.is_empty()) {
        println!("  origin: {origin}");
    }
    for meaning in &word.meanings {
        println!("    {}:", meaning.part_of_speech);
        for definition in &meaning.definitions {
            println!("        {}", definition.definition);
            match &definition.examples {
                Some(examples) => {
                    for example in examples {
                        println!("          example: {example}");
                    }
                }
                None => {
                    if let Some(example) = definition.example.as_deref().filter(|e| !e.is_empty()) {
                        println!("          example: {example}");
                    }
                }
            }
            if !definition.synonyms.is_empty() {
                println!("          synonyms: {}", definition.synonyms.join(", "));
            }
            if !definition.antonyms.is_empty() {
                println!("          antonyms: {}", definition.antonyms.join(", "));
            }
        }
    }
}
