use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending
/// `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells <= 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Next grapheme boundary after `byte_offset`. Returns None if at end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    if let Some((i, _)) = s[byte_offset..].grapheme_indices(true).nth(1) {
        return Some(byte_offset + i);
    }
    Some(s.len())
}

/// Previous grapheme boundary before `byte_offset`. Returns None if at 0.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .last()
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate_to_width("abc", 10), "abc");
        assert_eq!(truncate_to_width("abc", 3), "abc");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate_to_width("abcdef", 1), "\u{2026}");
        assert_eq!(truncate_to_width("abcdef", 0), "");
    }

    #[test]
    fn truncate_respects_wide_chars() {
        // Each CJK char is 2 cells wide
        let s = "日本語のテキスト";
        let out = truncate_to_width(s, 5);
        assert!(display_width(&out) <= 5);
        assert!(out.ends_with('\u{2026}'));
    }

    #[test]
    fn grapheme_boundaries_walk_combining_sequences() {
        let s = "ae\u{301}b"; // 'e' with combining acute
        let after_a = next_grapheme_boundary(s, 0).unwrap();
        assert_eq!(after_a, 1);
        let after_accent = next_grapheme_boundary(s, 1).unwrap();
        assert_eq!(&s[1..after_accent], "e\u{301}");
        assert_eq!(prev_grapheme_boundary(s, after_accent), Some(1));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
        assert_eq!(next_grapheme_boundary(s, s.len()), None);
    }
}
