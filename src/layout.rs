/*!
 * Layout fitting of translated text into an overlay rectangle.
 *
 * The fitter searches downward from the rectangle height for the largest
 * font size at which the wrapped text fits, assuming monospaced glyph cells
 * whose width is `font_size * aspect_ratio`. Nothing is rendered; the result
 * is a geometric plan.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::InputError;
use crate::text::script::is_cjk_dominant;

/// Smallest font size the search will try
pub const MIN_FONT_SIZE: u32 = 8;

/// Target rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Rectangle from an origin and a size; both dimensions must be positive
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Result<Self, InputError> {
        if width == 0 || height == 0 {
            return Err(InputError::InvalidRect(format!(
                "{}x{} at ({}, {})",
                width, height, x, y
            )));
        }
        Ok(Self { x, y, width, height })
    }

    /// Rectangle spanned by two opposite corners given in any order
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, InputError> {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        Self::new(left, top, right.abs_diff(left), bottom.abs_diff(top))
    }
}

/// Result of fitting text into a rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    /// Lines in display order
    pub wrapped_lines: Vec<String>,
    pub font_size: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Whether the accepted size satisfies both fit criteria
    pub fits: bool,
}

impl LayoutPlan {
    /// Wrapped lines joined with newlines
    pub fn text(&self) -> String {
        self.wrapped_lines.join("\n")
    }
}

/// Response body handed back to the overlay client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPayload {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl From<&LayoutPlan> for OverlayPayload {
    fn from(plan: &LayoutPlan) -> Self {
        Self {
            text: plan.text(),
            x: plan.x,
            y: plan.y,
            width: plan.width,
            height: plan.height,
        }
    }
}

/// Find the largest font size at which `text` fits in `rect`.
///
/// If no size down to `MIN_FONT_SIZE` fits, the plan for the smallest size
/// tried is returned with `fits == false`.
pub fn fit(text: &str, rect: &Rect, aspect_ratio: f64) -> LayoutPlan {
    let text = text.trim();
    let plan = |wrapped_lines: Vec<String>, font_size: u32, fits: bool| LayoutPlan {
        wrapped_lines,
        font_size,
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        fits,
    };

    if text.is_empty() {
        return plan(vec![String::new()], rect.height, true);
    }

    let cjk = is_cjk_dominant(text);
    let floor = MIN_FONT_SIZE.min(rect.height);
    let width = f64::from(rect.width);
    let height = u64::from(rect.height);

    let mut font_size = rect.height;
    loop {
        let glyph_width = f64::from(font_size) * aspect_ratio;
        let max_chars = max_chars_per_line(width, glyph_width);
        let lines = if cjk {
            wrap_chars(text, max_chars)
        } else {
            wrap_words(text, max_chars)
        };

        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let fits = (lines.len() as u64 * u64::from(font_size)) < height
            && (longest as f64 * glyph_width) < width;

        if fits || font_size <= floor {
            debug!(
                "Layout: font {} with {} lines in {}x{} (fits: {})",
                font_size,
                lines.len(),
                rect.width,
                rect.height,
                fits
            );
            return plan(lines, font_size, fits);
        }

        font_size -= 1;
    }
}

fn max_chars_per_line(width: f64, glyph_width: f64) -> usize {
    if glyph_width <= 0.0 {
        return usize::MAX;
    }
    ((width / glyph_width).floor() as usize).max(1)
}

/// Hard wrap every `max_chars` characters
pub fn wrap_chars(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }

    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect::<String>().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Greedy word wrap; a word longer than `max_chars` gets a line of its own
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}
