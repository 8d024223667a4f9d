use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_cells` terminal cells at a grapheme boundary.
/// No ellipsis is added; a wide character that would straddle the limit is
/// dropped.
pub fn clip_to_width(s: &str, max_cells: usize) -> &str {
    let mut width = 0;
    for (i, g) in s.grapheme_indices(true) {
        let gw = UnicodeWidthStr::width(g);
        if width + gw > max_cells {
            return &s[..i];
        }
        width += gw;
    }
    s
}

/// Left-align `s` in a column of `width` cells, padding with spaces.
/// Strings already wider than the column are returned unchanged.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = display_width(s);
    let mut out = String::with_capacity(s.len() + width.saturating_sub(w));
    out.push_str(s);
    for _ in w..width {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── display_width ──────────────────────────────────────────────

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn display_width_cjk() {
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn display_width_combining() {
        assert_eq!(display_width("cafe\u{0301}"), 4);
    }

    // ── clip_to_width ──────────────────────────────────────────────

    #[test]
    fn clip_short_string_unchanged() {
        assert_eq!(clip_to_width("Buy milk", 18), "Buy milk");
    }

    #[test]
    fn clip_ascii() {
        assert_eq!(
            clip_to_width("Prepare quarterly budget review", 18),
            "Prepare quarterly "
        );
    }

    #[test]
    fn clip_keeps_combining_marks() {
        assert_eq!(clip_to_width("cafe\u{0301}s", 4), "cafe\u{0301}");
    }

    #[test]
    fn clip_cjk_boundary() {
        // 你好世 is 6 cells; a 5-cell budget can't fit the third char
        assert_eq!(clip_to_width("你好世", 5), "你好");
    }

    #[test]
    fn clip_zero() {
        assert_eq!(clip_to_width("abc", 0), "");
    }

    // ── pad_to_width ───────────────────────────────────────────────

    #[test]
    fn pad_ascii() {
        assert_eq!(pad_to_width("ab", 5), "ab   ");
    }

    #[test]
    fn pad_wide_chars_by_cells() {
        assert_eq!(pad_to_width("你好", 6), "你好  ");
    }

    #[test]
    fn pad_overlong_unchanged() {
        assert_eq!(pad_to_width("abcdef", 3), "abcdef");
    }
}
