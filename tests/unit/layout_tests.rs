/*!
 * Tests for the layout fitter
 */

use overlay_translator::layout::{MIN_FONT_SIZE, fit, wrap_words};
use overlay_translator::text::aspect_ratio;
use overlay_translator::text::script::{CJK_ASPECT_RATIO, LATIN_ASPECT_RATIO};
use overlay_translator::{InputError, Rect};

fn assert_plan_fits(plan: &overlay_translator::LayoutPlan, ratio: f64) {
    let glyph = f64::from(plan.font_size) * ratio;
    assert!(plan.fits);
    assert!((plan.wrapped_lines.len() as u32 * plan.font_size) < plan.height);
    for line in &plan.wrapped_lines {
        assert!((line.chars().count() as f64 * glyph) < f64::from(plan.width), "line too wide: {:?}", line);
    }
}

#[test]
fn test_fit_withShortSentence_shouldUseOneLineAtLargeSize() {
    let rect = Rect::new(0, 0, 400, 60).unwrap();
    let plan = fit("Hello there.", &rect, LATIN_ASPECT_RATIO);

    assert_eq!(plan.wrapped_lines, vec!["Hello there."]);
    assert_plan_fits(&plan, LATIN_ASPECT_RATIO);
    // One size larger must violate a criterion
    let bigger = plan.font_size + 1;
    let too_tall = bigger >= rect.height;
    let too_wide = 12.0 * f64::from(bigger) * LATIN_ASPECT_RATIO >= 400.0;
    assert!(too_tall || too_wide);
}

#[test]
fn test_fit_withFortyCharText_shouldPickEighteen() {
    let rect = Rect::from_corners(200, 50, 0, 0).unwrap();
    let text = "word word word word word word word word";

    let plan = fit(text, &rect, aspect_ratio(text));

    assert_eq!(plan.font_size, 18);
    assert_eq!(plan.wrapped_lines.len(), 2);
    assert_plan_fits(&plan, LATIN_ASPECT_RATIO);
}

#[test]
fn test_fit_shouldPreserveWordsInOrder() {
    let rect = Rect::new(10, 10, 150, 90).unwrap();
    let text = "The quick brown fox jumps over the lazy dog near the river bank";

    let plan = fit(text, &rect, LATIN_ASPECT_RATIO);

    assert_eq!(plan.text().split_whitespace().collect::<Vec<_>>(), text.split_whitespace().collect::<Vec<_>>());
}

#[test]
fn test_fit_withOverflow_shouldReturnFloorAndNotFit() {
    let rect = Rect::new(0, 0, 30, 12).unwrap();
    let plan = fit("this text cannot possibly fit inside such a small box", &rect, LATIN_ASPECT_RATIO);

    assert_eq!(plan.font_size, MIN_FONT_SIZE);
    assert!(!plan.fits);
}

#[test]
fn test_fit_withCjkText_shouldBreakBetweenCharacters() {
    let rect = Rect::new(0, 0, 64, 80).unwrap();
    let text = "今日はいい天気ですね。散歩に行きましょう。";

    let plan = fit(text, &rect, CJK_ASPECT_RATIO);

    assert_plan_fits(&plan, CJK_ASPECT_RATIO);
    assert!(plan.wrapped_lines.len() > 1);
    assert_eq!(plan.wrapped_lines.concat(), text);
}

#[test]
fn test_fit_shouldCarryRectangleThrough() {
    let rect = Rect::new(-40, 25, 320, 48).unwrap();
    let plan = fit("Position stays put.", &rect, LATIN_ASPECT_RATIO);

    assert_eq!((plan.x, plan.y, plan.width, plan.height), (-40, 25, 320, 48));
}

#[test]
fn test_wrapWords_withOverlongWord_shouldNotSplitIt() {
    let lines = wrap_words("tiny incomprehensibilities here", 6);
    assert_eq!(lines, vec!["tiny", "incomprehensibilities", "here"]);
}

#[test]
fn test_rect_withZeroSize_shouldBeInputError() {
    assert_eq!(
        Rect::new(1, 1, 0, 10).unwrap_err(),
        InputError::InvalidRect("0x10 at (1, 1)".to_string())
    );
    assert!(Rect::from_corners(5, 5, 9, 5).is_err());
}
