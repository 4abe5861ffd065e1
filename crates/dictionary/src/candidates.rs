/// Case variants of `word` to try against a provider, original first, without
/// duplicates.
pub fn candidates(word: &str) -> Vec<String> {
    let lowercase = word.to_lowercase();
    let capitalized = capitalize(&lowercase);
    let uppercase = word.to_uppercase();

    let mut candidates: Vec<String> = Vec::with_capacity(4);
    for variant in [word.to_string(), lowercase, capitalized, uppercase] {
        if !candidates.contains(&variant) {
            candidates.push(variant);
        }
    }
    candidates
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
