use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Session configs and provider tables speak canonical ISO 639-3 codes
/// (`eng`, `rus`, ...). Users may type 2-letter or bibliographic codes,
/// which are canonicalized here before use.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
    /// Code outside ISO used by provider tables (`zht`)
    Extension,
}

/// Traditional Chinese; not an ISO 639-3 code but distinguished by every provider
pub const TRADITIONAL_CHINESE: &str = "zht";

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code == TRADITIONAL_CHINESE {
        return Ok(LanguageCodeType::Extension);
    }

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part2T),
        3 if part2b_to_part2t(&normalized_code).is_some() => Ok(LanguageCodeType::Part2B),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Normalize a language code to the canonical 3-letter form used across the crate
pub fn canonicalize(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    match validate_language_code(&normalized_code)? {
        LanguageCodeType::Part1 => Language::from_639_1(&normalized_code)
            .map(|lang| lang.to_639_3().to_string())
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
        LanguageCodeType::Part2B => part2b_to_part2t(&normalized_code)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
        LanguageCodeType::Part2T | LanguageCodeType::Extension => Ok(normalized_code),
    }
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (canonicalize(code1), canonicalize(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = canonicalize(code)?;
    if normalized == TRADITIONAL_CHINESE {
        return Ok("Traditional Chinese".to_string());
    }

    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Look up a provider-specific code in a provider's language table
pub fn lookup_provider_code<'a>(table: &'a [(&'a str, &'a str)], code: &str) -> Option<&'a str> {
    let canonical = canonicalize(code).ok()?;
    table
        .iter()
        .find(|(canonical_code, _)| *canonical_code == canonical)
        .map(|(_, provider_code)| *provider_code)
}
