/*!
 * Script classification.
 *
 * Decides whether a string is dominated by CJK characters, which selects
 * both sentence-wrapping behavior and the glyph cell estimate used by the
 * layout fitter.
 */

/// Glyph width/height ratio assumed for CJK-dominant text
pub const CJK_ASPECT_RATIO: f64 = 1.05;

/// Glyph width/height ratio assumed for all other text
pub const LATIN_ASPECT_RATIO: f64 = 0.57;

/// Whether a character belongs to the CJK Unified Ideographs, Hiragana,
/// Katakana or Hangul Syllables blocks
pub fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{AC00}'..='\u{D7AF}')
}

/// More than half of the characters are CJK
pub fn is_cjk_dominant(text: &str) -> bool {
    let total = text.chars().count().max(1);
    let cjk = text.chars().filter(|ch| is_cjk(*ch)).count();
    cjk as f64 / total as f64 > 0.5
}

/// Estimated glyph aspect ratio for the layout search
pub fn aspect_ratio(text: &str) -> f64 {
    if is_cjk_dominant(text) {
        CJK_ASPECT_RATIO
    } else {
        LATIN_ASPECT_RATIO
    }
}
