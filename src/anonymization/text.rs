//! Span helpers over immutable text buffers
//!
//! All offsets are byte offsets into the buffer they were computed against and
//! always fall on `char` boundaries. Windows are measured in characters.

/// A half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The `n` characters immediately preceding byte offset `start`
pub fn window_before(text: &str, start: usize, n: usize) -> &str {
    let head = &text[..start];
    let from = head
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(start);
    &head[from..]
}

/// The `n` characters immediately following byte offset `end`
pub fn window_after(text: &str, end: usize, n: usize) -> &str {
    let tail = &text[end..];
    let to = tail
        .char_indices()
        .nth(n)
        .map(|(idx, _)| idx)
        .unwrap_or(tail.len());
    &tail[..to]
}

/// `n` characters either side of `span`, including the span itself
pub fn window_around(text: &str, span: Span, n: usize) -> &str {
    let before = window_before(text, span.start, n);
    let after = window_after(text, span.end, n);
    let from = span.start - before.len();
    let to = span.end + after.len();
    &text[from..to]
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte spans of every whole-word occurrence of `needle` in `haystack`
///
/// An occurrence counts only if it is not glued to a word character on
/// either side, so `"Ann"` is found in `"Ann saw"` but not in `"Annual"`.
pub fn word_occurrences(haystack: &str, needle: &str) -> Vec<Span> {
    if needle.is_empty() {
        return Vec::new();
    }

    haystack
        .match_indices(needle)
        .filter(|(idx, _)| {
            let end = idx + needle.len();
            let before_ok = haystack[..*idx]
                .chars()
                .next_back()
                .map_or(true, |c| !is_word_char(c) || !needle.starts_with(is_word_char));
            let after_ok = haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !is_word_char(c) || !needle.ends_with(is_word_char));
            before_ok && after_ok
        })
        .map(|(idx, _)| Span::new(idx, idx + needle.len()))
        .collect()
}

/// Check whether `needle` occurs as a whole word in `haystack`
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    !word_occurrences(haystack, needle).is_empty()
}

/// Split on ASCII spaces/tabs, returning each word with its byte offset
pub fn words_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;

    for (idx, c) in text.char_indices() {
        match (c == ' ' || c == '\t', start) {
            (true, Some(s)) => {
                words.push((s, &text[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push((s, &text[s..]));
    }

    words
}

/// Rebuild `text`, replacing each span with its tag
///
/// Spans must be sorted and non-overlapping.
pub fn splice(text: &str, replacements: &[(Span, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for (span, tag) in replacements {
        out.push_str(&text[cursor..span.start]);
        out.push_str(tag);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_before() {
        let text = "Tab. Augmentin";
        assert_eq!(window_before(text, 5, 10), "Tab. ");
        assert_eq!(window_before(text, 14, 4), "ntin");
        assert_eq!(window_before(text, 0, 10), "");
    }

    #[test]
    fn test_window_after() {
        let text = "Rahul 500mg";
        assert_eq!(window_after(text, 5, 3), " 50");
        assert_eq!(window_after(text, 5, 50), " 500mg");
        assert_eq!(window_after(text, 11, 5), "");
    }

    #[test]
    fn test_windows_respect_char_boundaries() {
        let text = "née Zoë Müller";
        let start = text.find("Zoë").unwrap();
        assert_eq!(window_before(text, start, 2), "e ");
        assert_eq!(window_before(text, start, 4), "née ");
        let span = Span::new(start, start + "Zoë".len());
        assert_eq!(window_around(text, span, 2), "e Zoë M");
    }

    #[test]
    fn test_word_occurrences() {
        let text = "Ann met Annual Ann.";
        let spans = word_occurrences(text, "Ann");
        assert_eq!(spans, vec![Span::new(0, 3), Span::new(15, 18)]);
    }

    #[test]
    fn test_word_occurrences_multiword() {
        let text = "Rahul Verma and Rahul Vermani";
        assert_eq!(word_occurrences(text, "Rahul Verma").len(), 1);
    }

    #[test]
    fn test_word_occurrences_non_word_needle() {
        let text = "on 12/03/2024 and 12/03/2024.";
        assert_eq!(word_occurrences(text, "12/03/2024").len(), 2);
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("tab. augmentin 625mg", "augmentin"));
        assert!(!contains_word("augmentinx", "augmentin"));
    }

    #[test]
    fn test_words_with_offsets() {
        let words = words_with_offsets("Sharma  Tab\tX");
        assert_eq!(words, vec![(0, "Sharma"), (8, "Tab"), (12, "X")]);
    }

    #[test]
    fn test_splice() {
        let text = "Ann met Bob";
        let out = splice(
            text,
            &[(Span::new(0, 3), "[PERSON_NAME]"), (Span::new(8, 11), "[PERSON_NAME]")],
        );
        assert_eq!(out, "[PERSON_NAME] met [PERSON_NAME]");
    }

    #[test]
    fn test_span_overlaps() {
        assert!(Span::new(0, 5).overlaps(&Span::new(4, 6)));
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 6)));
    }
}
