use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// The daemon's target language is configured as an ISO 639-1 (2-letter) or
/// ISO 639-3 (3-letter) code. Validation happens once at startup so a typo'd
/// code fails fast instead of producing a cycle of garbage translations.
/// Resolve a language code to an isolang [`Language`].
fn resolve_language(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// Validate that a language code is a known ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve_language(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English language name from a code
///
/// Used to build the system prompt: the model translates more reliably when
/// told "French" rather than "fr".
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = resolve_language(code)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
