//! Name casing helpers used for parameter aliases and registry lookups.
//!
//! Both keep acronyms intact: words are split only on `_` (camel) or on a
//! lower/digit to upper transition (snake), and the letters inside a word
//! keep their case apart from the one being capitalised or lowered.

use convert_case::{Boundary, Converter};

/// First word as written, every later word with its first letter upper-cased.
fn camel_words(words: &[&str]) -> Vec<String> {
    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) if index > 0 => first.to_uppercase().chain(chars).collect::<String>(),
                _ => (*word).to_string(),
            }
        })
        .collect()
}

fn lower_words(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_lowercase()).collect()
}

/// `user_public__first_name__eq` -> `userPublicFirstNameEq`, `API_Key` -> `APIKey`
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    Converter::new()
        .set_boundaries(&[Boundary::UNDERSCORE])
        .set_pattern(camel_words)
        .set_delim("")
        .convert(name)
}

/// `firstName` -> `first_name`, `APIKey` -> `apikey`
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    Converter::new()
        .set_boundaries(&[Boundary::LOWER_UPPER, Boundary::DIGIT_UPPER])
        .set_pattern(lower_words)
        .set_delim("_")
        .convert(name)
}
