/*!
 * Tests for sentence segmentation and script classification
 */

use overlay_translator::text::script::{CJK_ASPECT_RATIO, LATIN_ASPECT_RATIO};
use overlay_translator::text::segmenter::{is_bare_terminal, normalize_ellipsis};
use overlay_translator::text::{aspect_ratio, is_cjk_dominant, split_into_sentences};

fn non_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn test_split_joinedWithSpaces_shouldKeepEveryCharacterInOrder() {
    let inputs = [
        "Hello there. How are you?",
        "No terminal punctuation at all",
        "  leading and trailing  spaces!  ",
        "Wait..... what?! Really.",
        "混合 text。 さようなら！ 안녕하세요？",
        "Line one.\nLine two\nstill two? yes",
        "...",
        "",
    ];

    for input in inputs {
        let joined = split_into_sentences(input).join(" ");
        assert_eq!(
            non_whitespace(&joined),
            non_whitespace(&normalize_ellipsis(input)),
            "round trip failed for {:?}",
            input
        );
    }
}

#[test]
fn test_split_withLongDotRun_shouldEndInExactlyThreeDots() {
    let sentences = split_into_sentences("Wait.....");
    assert_eq!(sentences, vec!["Wait..."]);
    assert!(!sentences[0].ends_with("...."));
}

#[test]
fn test_split_withTwoDots_shouldNormalizeToEllipsis() {
    assert_eq!(split_into_sentences("Hmm.. fine."), vec!["Hmm...", "fine."]);
}

#[test]
fn test_split_withEmptyText_shouldReturnNothing() {
    assert!(split_into_sentences("").is_empty());
    assert!(split_into_sentences("   \n ").is_empty());
}

#[test]
fn test_split_withStrayPeriod_shouldEmitBareTerminal() {
    let sentences = split_into_sentences("Done. .");
    assert_eq!(sentences, vec!["Done.", "."]);
    assert!(is_bare_terminal(&sentences[1]));
    assert!(!is_bare_terminal(&sentences[0]));
}

#[test]
fn test_isBareTerminal_withFullWidthMarks_shouldMatch() {
    assert!(is_bare_terminal("。"));
    assert!(is_bare_terminal(" ？ "));
    assert!(!is_bare_terminal("..."));
    assert!(!is_bare_terminal(""));
}

#[test]
fn test_isCjkDominant_shouldUseMajorityOfCharacters() {
    assert!(is_cjk_dominant("日本語のテキスト"));
    assert!(is_cjk_dominant("한국어 텍스트"));
    assert!(!is_cjk_dominant("Plain English"));
    // 2 of 5 characters
    assert!(!is_cjk_dominant("ab日本c"));
    assert!(!is_cjk_dominant(""));
}

#[test]
fn test_aspectRatio_shouldFollowDominantScript() {
    assert_eq!(aspect_ratio("こんにちは"), CJK_ASPECT_RATIO);
    assert_eq!(aspect_ratio("Hello"), LATIN_ASPECT_RATIO);
    assert_eq!(aspect_ratio("Привет"), LATIN_ASPECT_RATIO);
}
