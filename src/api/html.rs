//! HTML → plain text for item bodies.
//!
//! HN bodies use a tiny subset of HTML: `<p>` separates paragraphs, `<br>`
//! breaks lines, and `<a>`, `<i>`, `<pre>`, `<code>` wrap text. Paragraph and
//! line breaks become newlines; every other tag is dropped and its text kept.
//! A `<` that does not open a tag is ordinary text.

use std::sync::OnceLock;

use regex::Regex;

/// Comments, or start/end tags whose quoted attribute values may contain `>`.
fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r#"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9]*)(?:[^>"']|"[^"]*"|'[^']*')*>"#)
            .unwrap_or_else(|e| panic!("tag pattern: {e}"))
    })
}

/// Convert an optional HTML body to plain text. `None` yields an empty string.
pub fn html_to_text(html: Option<&str>) -> String {
    let Some(html) = html else {
        return String::new();
    };

    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for caps in tag_pattern().captures_iter(html) {
        let Some(tag) = caps.get(0) else { continue };
        push_text(&mut out, &html[last..tag.start()]);
        last = tag.end();

        // End tags and comments contribute nothing
        let is_end_tag = caps.get(1).is_some_and(|slash| !slash.as_str().is_empty());
        let Some(name) = caps.get(2).filter(|_| !is_end_tag) else {
            continue;
        };
        match name.as_str().to_ascii_lowercase().as_str() {
            "p" => out.push_str("\n\n"),
            "br" => out.push('\n'),
            _ => {}
        }
    }
    push_text(&mut out, &html[last..]);
    out
}

fn push_text(out: &mut String, raw: &str) {
    if !raw.is_empty() {
        out.push_str(&html_escape::decode_html_entities(raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_empty() {
        assert_eq!(html_to_text(None), "");
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        let html = "Acme | Remote<p>Rust, Go<br>Apply within";
        assert_eq!(html_to_text(Some(html)), "Acme | Remote\n\nRust, Go\nApply within");
    }

    #[test]
    fn test_other_tags_are_stripped() {
        let html = r#"See <a href="https://example.com" rel="nofollow">our site</a> <i>now</i>"#;
        assert_eq!(html_to_text(Some(html)), "See our site now");
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = "R&amp;D &#x2F; ML &gt; ops &quot;fun&quot; &#x27;ok&#x27;";
        assert_eq!(html_to_text(Some(html)), "R&D / ML > ops \"fun\" 'ok'");
    }

    #[test]
    fn test_uppercase_and_self_closing_break() {
        assert_eq!(html_to_text(Some("a<BR/>b<P>c")), "a\nb\n\nc");
    }

    #[test]
    fn test_quoted_attribute_may_contain_angle_bracket() {
        let html = r#"<a href="https://x.com/?q=a>b" rel="nofollow">link</a> ok"#;
        assert_eq!(html_to_text(Some(html)), "link ok");
        let html = "<a title='x > y'>t</a><p>next";
        assert_eq!(html_to_text(Some(html)), "t\n\nnext");
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(html_to_text(Some("a<!-- <p> x > y -->b")), "ab");
    }

    #[test]
    fn test_unterminated_tag_kept_as_text() {
        assert_eq!(html_to_text(Some("salary < 100k")), "salary < 100k");
    }

    #[test]
    fn test_code_block_text_survives() {
        let html = "<pre><code>fn main() {}\n</code></pre>";
        assert_eq!(html_to_text(Some(html)), "fn main() {}\n");
    }
}
