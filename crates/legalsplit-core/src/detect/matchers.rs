//! Per-page pattern matchers. Pure functions of a page's text and the
//! pattern table; all cross-page memory lives in [`super::state::ScanState`].

use crate::model::PageObservation;
use crate::patterns::schema::SearchWindowDef;
use crate::patterns::PatternSet;
use std::borrow::Cow;

/// Run every matcher over one page.
pub fn observe(patterns: &PatternSet, page_index: usize, text: &str) -> PageObservation {
    PageObservation {
        page_index,
        is_low_text: is_low_text(text, patterns.min_text_length),
        page_of: find_page_of(patterns, text),
        standalone: find_standalone_page(patterns, text),
        header_type: find_header_type(patterns, text),
        title: find_title(patterns, text),
    }
}

/// A page is low-text when its trimmed text is shorter than `min_len` characters.
pub fn is_low_text(text: &str, min_len: usize) -> bool {
    text.trim().chars().count() < min_len
}

/// Find "Page X of Y" numbering. Returns the first pattern hit whose
/// numbers are both positive.
pub fn find_page_of(patterns: &PatternSet, text: &str) -> Option<(u32, u32)> {
    let window = search_window(text, patterns.page_of_window);

    patterns.page_of.iter().find_map(|re| {
        let caps = re.captures(&window)?;
        let current: u32 = caps.get(1)?.as_str().parse().ok()?;
        let total: u32 = caps.get(2)?.as_str().parse().ok()?;
        (current >= 1 && total >= 1).then_some((current, total))
    })
}

/// Find a standalone page number in `1..=standalone_max`.
pub fn find_standalone_page(patterns: &PatternSet, text: &str) -> Option<u32> {
    let window = search_window(text, patterns.standalone_window);

    patterns.standalone.iter().find_map(|re| {
        let caps = re.captures(&window)?;
        let n: u32 = caps.get(1)?.as_str().parse().ok()?;
        (1..=patterns.standalone_max).contains(&n).then_some(n)
    })
}

/// Find the document-type keyword in the page header.
///
/// When several keywords appear, the longest wins ("SEARCH WARRANT" over
/// "WARRANT"); equal lengths resolve to table order.
pub fn find_header_type(patterns: &PatternSet, text: &str) -> Option<String> {
    let header = head(text, patterns.header_search_chars).to_uppercase();

    let mut best: Option<&String> = None;
    for keyword in &patterns.header_types {
        if header.contains(keyword.as_str()) && best.map_or(true, |b| keyword.len() > b.len()) {
            best = Some(keyword);
        }
    }
    best.cloned()
}

/// Find a title line: one of the first lines of the page, of plausible
/// length, mentioning a header keyword.
pub fn find_title(patterns: &PatternSet, text: &str) -> Option<String> {
    let cfg = &patterns.title;

    head(text, cfg.search_chars)
        .split('\n')
        .take(cfg.max_lines)
        .map(str::trim)
        .filter(|line| {
            let len = line.chars().count();
            len >= cfg.min_len && len <= cfg.max_len
        })
        .find(|line| {
            let upper = line.to_uppercase();
            patterns
                .header_types
                .iter()
                .any(|k| upper.contains(k.as_str()))
        })
        .map(str::to_string)
}

/// The part of a page a matcher inspects: the head, plus the tail when the
/// page is longer than both together.
fn search_window(text: &str, window: SearchWindowDef) -> Cow<'_, str> {
    let len = text.chars().count();
    if len <= window.head_chars + window.tail_chars {
        return Cow::Borrowed(text);
    }
    if window.tail_chars == 0 {
        return Cow::Borrowed(head(text, window.head_chars));
    }
    Cow::Owned(format!(
        "{}\n{}",
        head(text, window.head_chars),
        tail(text, window.tail_chars)
    ))
}

fn head(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn tail(text: &str, chars: usize) -> &str {
    if chars == 0 {
        return "";
    }
    match text.char_indices().rev().nth(chars - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::builtin::load_preset;

    fn legal() -> PatternSet {
        load_preset("legal").unwrap()
    }

    #[test]
    fn test_head_and_tail_are_char_safe() {
        assert_eq!(head("§§§abc", 2), "§§");
        assert_eq!(tail("abc§§", 2), "§§");
        assert_eq!(head("ab", 10), "ab");
        assert_eq!(tail("ab", 10), "ab");
    }

    #[test]
    fn test_search_window_joins_head_and_tail() {
        let text = format!("{}{}{}", "a".repeat(5), "b".repeat(10), "c".repeat(3));
        let w = search_window(
            &text,
            SearchWindowDef {
                head_chars: 5,
                tail_chars: 3,
            },
        );
        assert_eq!(w, "aaaaa\nccc");
    }

    #[test]
    fn test_low_text_uses_trimmed_length() {
        assert!(is_low_text("", 50));
        assert!(is_low_text(&format!("   {}   ", "x".repeat(49)), 50));
        assert!(!is_low_text(&"x".repeat(50), 50));
    }

    #[test]
    fn test_page_of_variants() {
        let p = legal();
        assert_eq!(find_page_of(&p, "Page 2 of 5"), Some((2, 5)));
        assert_eq!(find_page_of(&p, "header\nPAGE 3 OF 3\n"), Some((3, 3)));
        assert_eq!(find_page_of(&p, "PA GE 4 OF 7"), Some((4, 7)));
        assert_eq!(find_page_of(&p, "P. 1 of 2"), Some((1, 2)));
        assert_eq!(find_page_of(&p, "Page 2/9"), Some((2, 9)));
        assert_eq!(find_page_of(&p, "4 of 6 pages"), Some((4, 6)));
        assert_eq!(find_page_of(&p, "Page 4"), None);
    }

    #[test]
    fn test_page_of_rejects_zero() {
        let p = legal();
        assert_eq!(find_page_of(&p, "Page 0 of 5"), None);
    }

    #[test]
    fn test_page_of_found_in_footer_of_long_page() {
        let p = legal();
        let text = format!("{}\nPage 7 of 7", "body text ".repeat(400));
        assert_eq!(find_page_of(&p, &text), Some((7, 7)));
    }

    #[test]
    fn test_standalone_variants() {
        let p = legal();
        assert_eq!(find_standalone_page(&p, "some text\nPage 3"), Some(3));
        assert_eq!(find_standalone_page(&p, "PAGE 12\nbody"), Some(12));
        assert_eq!(find_standalone_page(&p, "body\n- 4 -\n"), Some(4));
        assert_eq!(find_standalone_page(&p, "body\n— 2 —"), Some(2));
        assert_eq!(find_standalone_page(&p, "filed 2024-11-05"), None);
        assert_eq!(find_standalone_page(&p, "no numbering here"), None);
    }

    #[test]
    fn test_standalone_out_of_range_ignored() {
        let p = legal();
        assert_eq!(find_standalone_page(&p, "Page 0"), None);
        assert_eq!(find_standalone_page(&p, "Page 12345"), None);
    }

    #[test]
    fn test_header_prefers_longest_keyword() {
        let p = legal();
        assert_eq!(
            find_header_type(&p, "STATE OF TEXAS\nSEARCH WARRANT\n"),
            Some("SEARCH WARRANT".to_string())
        );
        assert_eq!(
            find_header_type(&p, "Warrant for arrest"),
            Some("WARRANT".to_string())
        );
        assert_eq!(find_header_type(&p, "plain letter"), None);
    }

    #[test]
    fn test_header_only_looks_at_top_of_page() {
        let p = legal();
        let text = format!("{}AFFIDAVIT", "x".repeat(600));
        assert_eq!(find_header_type(&p, &text), None);
    }

    #[test]
    fn test_title_length_filter() {
        let p = legal();
        assert_eq!(find_title(&p, "ORDER\nmore"), None);
        assert_eq!(
            find_title(&p, "IN THE DISTRICT COURT\nAFFIDAVIT FOR SEARCH WARRANT\n"),
            Some("AFFIDAVIT FOR SEARCH WARRANT".to_string())
        );
        let long = format!("AFFIDAVIT {}", "x".repeat(120));
        assert_eq!(find_title(&p, &long), None);
    }

    #[test]
    fn test_title_only_first_lines() {
        let p = legal();
        let text = format!("{}AFFIDAVIT OF JOHN DOE", "line\n".repeat(10));
        assert_eq!(find_title(&p, &text), None);
    }

    #[test]
    fn test_observe_collects_everything() {
        let p = legal();
        let obs = observe(&p, 3, "SEARCH WARRANT NO. 12\nPage 1 of 2");
        assert_eq!(obs.page_index, 3);
        assert!(obs.is_low_text);
        assert_eq!(obs.page_of, Some((1, 2)));
        assert_eq!(obs.header_type.as_deref(), Some("SEARCH WARRANT"));
        assert_eq!(obs.title.as_deref(), Some("SEARCH WARRANT NO. 12"));
    }
}
