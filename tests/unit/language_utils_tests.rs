/*!
 * Tests for language utility functions
 */

use overlay_translator::language_utils::{
    LanguageCodeType, TRADITIONAL_CHINESE, lookup_provider_code, validate_language_code,
};
use overlay_translator::providers::google::GOOGLE_LANGUAGES;
use overlay_translator::providers::mock::MOCK_LANGUAGES;
use overlay_translator::{canonicalize, get_language_name, language_codes_match};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    // ISO 639-1 tests
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("ja").unwrap(), LanguageCodeType::Part1));

    // ISO 639-2/T tests
    assert!(matches!(validate_language_code("rus").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("ukr").unwrap(), LanguageCodeType::Part2T));

    // ISO 639-2/B tests
    assert!(matches!(validate_language_code("chi").unwrap(), LanguageCodeType::Part2B));

    // Traditional Chinese
    assert!(matches!(validate_language_code("ZHT").unwrap(), LanguageCodeType::Extension));

    // Invalid codes
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_canonicalize_withEveryCodeForm_shouldReturnThreeLetterCode() {
    assert_eq!(canonicalize("ja").unwrap(), "jpn");
    assert_eq!(canonicalize("KO").unwrap(), "kor");
    assert_eq!(canonicalize("ger").unwrap(), "deu");
    assert_eq!(canonicalize(" zho ").unwrap(), "zho");
    assert_eq!(canonicalize("zht").unwrap(), TRADITIONAL_CHINESE);
}

#[test]
fn test_language_codes_match_withMixedForms_shouldCompareCanonically() {
    assert!(language_codes_match("uk", "ukr"));
    assert!(language_codes_match("chi", "zh"));
    assert!(!language_codes_match("zh", "zht"));
    assert!(!language_codes_match("en", "invalid"));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert_eq!(get_language_name("rus").unwrap(), "Russian");
    assert_eq!(get_language_name("zht").unwrap(), "Traditional Chinese");
    assert!(get_language_name("zz9").is_err());
}

#[test]
fn test_lookup_provider_code_shouldAcceptAnyCodeForm() {
    assert_eq!(lookup_provider_code(GOOGLE_LANGUAGES, "zh"), Some("zh-cn"));
    assert_eq!(lookup_provider_code(GOOGLE_LANGUAGES, "zht"), Some("zh-tw"));
    assert_eq!(lookup_provider_code(GOOGLE_LANGUAGES, "ger"), Some("de"));
    assert_eq!(lookup_provider_code(MOCK_LANGUAGES, "ko"), None);
    assert_eq!(lookup_provider_code(MOCK_LANGUAGES, "not-a-code"), None);
}
