//! Inline link detection.
//!
//! Splits message text into plain and link runs. A link starts with
//! `http://`, `https://` or `www.` at a word boundary and runs until
//! whitespace; trailing sentence punctuation is left out of the link.

const LINK_PREFIXES: [&str; 3] = ["https://", "http://", "www."];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\'', '"'];

/// A run of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text.
    Text(&'a str),
    /// A detected link.
    Link(&'a str),
}

impl<'a> Segment<'a> {
    /// The underlying text.
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Text(s) | Self::Link(s) => s,
        }
    }
}

/// Split `text` into plain and link segments.
///
/// Concatenating the segments yields `text` unchanged.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let at_boundary =
            text[..pos].chars().next_back().is_none_or(|c| !c.is_alphanumeric());

        if let Some(prefix_len) = link_prefix_len(rest).filter(|_| at_boundary) {
            let end = pos + link_len(rest);
            if end > pos + prefix_len {
                if plain_start < pos {
                    out.push(Segment::Text(&text[plain_start..pos]));
                }
                out.push(Segment::Link(&text[pos..end]));
                plain_start = end;
                pos = end;
                continue;
            }
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    if plain_start < text.len() {
        out.push(Segment::Text(&text[plain_start..]));
    }
    out
}

fn link_prefix_len(s: &str) -> Option<usize> {
    LINK_PREFIXES
        .iter()
        .find(|prefix| s.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix)))
        .map(|prefix| prefix.len())
}

fn link_len(s: &str) -> usize {
    let token_end = s.find(char::is_whitespace).unwrap_or(s.len());
    s[..token_end].trim_end_matches(TRAILING_PUNCTUATION).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(segments("hello there"), vec![Segment::Text("hello there")]);
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert!(segments("").is_empty());
    }

    #[test]
    fn detects_links_in_sentence() {
        assert_eq!(segments("see https://example.com/a?b=1 and www.rust-lang.org."), vec![
            Segment::Text("see "),
            Segment::Link("https://example.com/a?b=1"),
            Segment::Text(" and "),
            Segment::Link("www.rust-lang.org"),
            Segment::Text("."),
        ]);
    }

    #[test]
    fn link_only() {
        assert_eq!(segments("http://x.io"), vec![Segment::Link("http://x.io")]);
    }

    #[test]
    fn prefix_inside_word_is_not_a_link() {
        assert_eq!(segments("awww.nope"), vec![Segment::Text("awww.nope")]);
    }

    #[test]
    fn bare_prefix_is_not_a_link() {
        assert_eq!(segments("http:// alone"), vec![Segment::Text("http:// alone")]);
    }

    #[test]
    fn prefix_with_only_punctuation_is_not_a_link() {
        assert_eq!(segments("www..."), vec![Segment::Text("www...")]);
    }

    #[test]
    fn parenthesised_link() {
        assert_eq!(segments("(https://a.b)"), vec![
            Segment::Text("("),
            Segment::Link("https://a.b"),
            Segment::Text(")"),
        ]);
    }

    #[test]
    fn multibyte_text_around_links() {
        let text = "héllo www.ü.de ✓";
        let joined: String = segments(text).iter().map(Segment::as_str).collect();

        assert_eq!(joined, text);
        assert!(segments(text).contains(&Segment::Link("www.ü.de")));
    }
}
