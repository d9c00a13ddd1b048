//! Wrapper-tag stripping for report text
//!
//! The HTML renderer wraps content in a closed set of tags (`span`, `br`).
//! [`plain_text`] removes exactly those tags with a small state machine and
//! then decodes the entities the normalizer introduced. Any other tag-like
//! text is kept verbatim.

/// Tags emitted by the HTML renderer
const WRAPPER_TAGS: &[&str] = &["span", "br"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Text,
    /// Inside `<...`, collecting the tag until `>`
    Tag,
}

/// Remove wrapper tags from a rendered fragment
pub fn strip_wrappers(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut state = ScanState::Text;

    for ch in html.chars() {
        match (state, ch) {
            (ScanState::Text, '<') => {
                tag.clear();
                tag.push(ch);
                state = ScanState::Tag;
            }
            (ScanState::Text, _) => out.push(ch),
            (ScanState::Tag, '>') => {
                tag.push(ch);
                if !is_wrapper_tag(&tag) {
                    out.push_str(&tag);
                }
                state = ScanState::Text;
            }
            (ScanState::Tag, '<') => {
                // The previous `<` never closed
                out.push_str(&tag);
                tag.clear();
                tag.push(ch);
            }
            (ScanState::Tag, _) => tag.push(ch),
        }
    }

    if state == ScanState::Tag {
        out.push_str(&tag);
    }
    out
}

/// Whether a complete `<...>` tag belongs to the wrapper set
fn is_wrapper_tag(tag: &str) -> bool {
    let inner = tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_start_matches('/')
        .trim_end_matches('/');
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    WRAPPER_TAGS.contains(&name.as_str())
}

/// Decode the entities produced by normalization and rendering
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate.find(';').and_then(|semi| {
            let ch = match &candidate[1..semi] {
                "lt" => '<',
                "gt" => '>',
                "amp" => '&',
                "nbsp" => ' ',
                _ => return None,
            };
            Some((ch, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Plain text of a rendered fragment
pub fn plain_text(html: &str) -> String {
    decode_entities(&strip_wrappers(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_span_and_br() {
        let html = r#"<span>A </span><span style="background-color:#CB6D6D">B </span><br>"#;
        assert_eq!(strip_wrappers(html), "A B ");
    }

    #[test]
    fn test_keeps_foreign_tags() {
        assert_eq!(strip_wrappers("<b>x</b><SPAN>y</SPAN>"), "<b>x</b>y");
        assert_eq!(strip_wrappers("<spanner>z"), "<spanner>z");
    }

    #[test]
    fn test_unclosed_tag_is_text() {
        assert_eq!(strip_wrappers("a < b"), "a < b");
        assert_eq!(strip_wrappers("a <<span>b"), "a <b");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;a&gt; &amp; b"), "<a> & b");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("AT&T &copy; x&"), "AT&T &copy; x&");
    }

    #[test]
    fn test_plain_text_of_escaped_markup() {
        let html = "<span>&lt;item&gt; </span><br>";
        assert_eq!(plain_text(html), "<item> ");
    }
}
