use serde::Serialize;

/// A run of text, `matched` when it is an occurrence of the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn new(text: &str, matched: bool) -> Self {
        Self {
            text: text.to_string(),
            matched,
        }
    }
}

/// Split `text` around case-insensitive literal occurrences of `query`.
///
/// Segments keep the original casing and concatenate back to `text`. A blank
/// query yields the whole text as one unmatched segment.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    let needle: Vec<char> = query.trim().chars().flat_map(char::to_lowercase).collect();
    if text.is_empty() {
        return Vec::new();
    }
    if needle.is_empty() {
        return vec![Segment::new(text, false)];
    }

    // Lowercase per char so matches map back to byte offsets in `text`.
    let folded: Vec<(usize, Vec<char>)> = text
        .char_indices()
        .map(|(offset, ch)| (offset, ch.to_lowercase().collect()))
        .collect();

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut index = 0;
    while index < folded.len() {
        match match_len(&folded[index..], &needle) {
            Some(len) => {
                let start = folded[index].0;
                let end = folded.get(index + len).map_or(text.len(), |(offset, _)| *offset);
                if plain_start < start {
                    segments.push(Segment::new(&text[plain_start..start], false));
                }
                segments.push(Segment::new(&text[start..end], true));
                plain_start = end;
                index += len;
            }
            None => index += 1,
        }
    }
    if plain_start < text.len() {
        segments.push(Segment::new(&text[plain_start..], false));
    }
    segments
}

/// Number of source chars consumed when `needle` matches at the start of `chars`
fn match_len(chars: &[(usize, Vec<char>)], needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (consumed, (_, folded)) in chars.iter().enumerate() {
        let rest = &needle[matched..];
        if rest.len() < folded.len() || !rest.starts_with(folded) {
            return None;
        }
        matched += folded.len();
        if matched == needle.len() {
            return Some(consumed + 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| if s.matched { format!("[{}]", s.text) } else { s.text.clone() })
            .collect()
    }

    #[test]
    fn marks_every_occurrence_keeping_case() {
        let segments = highlight("Notes and NOTES", "note");
        assert_eq!(render(&segments), "[Note]s and [NOTE]S");
    }

    #[test]
    fn blank_query_is_one_plain_segment() {
        assert_eq!(highlight("Title", ""), vec![Segment::new("Title", false)]);
        assert!(highlight("", "x").is_empty());
    }

    #[test]
    fn query_is_literal() {
        assert_eq!(render(&highlight("a.b axb", "a.b")), "[a.b] axb");
        assert_eq!(render(&highlight("(1+1)", "1+1")), "([1+1])");
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(render(&highlight("Café CAFÉ", "café")), "[Café] [CAFÉ]");
    }

    #[test]
    fn no_match_returns_text() {
        assert_eq!(render(&highlight("Roadmap", "zz")), "Roadmap");
    }
}
