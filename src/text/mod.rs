/*!
 * Text analysis helpers shared by translation and layout.
 *
 * - `script`: CJK detection and glyph aspect-ratio estimates
 * - `segmenter`: sentence splitting of recognized text
 * - `spelling`: optional dictionary-based correction of recognized text
 */

pub mod script;
pub mod segmenter;
pub mod spelling;

pub use self::script::{aspect_ratio, is_cjk, is_cjk_dominant};
pub use self::segmenter::{clean_punctuation_spacing, normalize_ellipsis, split_into_sentences};
pub use self::spelling::{SpellChecker, SpellingResource};
