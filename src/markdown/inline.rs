//! Inline span parsing.
//!
//! Inline rules run as ordered passes over an already-escaped line:
//!
//! 1. escape (once, up front)
//! 2. `` `code` ``
//! 3. `![alt](url)`
//! 4. `[label](url)`
//! 5. `**bold**`
//! 6. `_italic_`
//!
//! Each pass sees the whole line: text runs joined, with spans from earlier
//! passes pinned between bytes as opaque atoms. Delimiters only ever come
//! from text, so a link label or emphasis body may contain code, images or
//! other links while code contents, URLs and alt text stay untouched.
//! Unmatched markers stay as literal text.

use std::ops::{Range, RangeInclusive};
use std::vec;

use memchr::{memchr, memmem};

use super::escape::{escape_html, safe_url};

/// A styled run of inline content. All strings are already HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    Text(String),
    Code(String),
    Bold(Vec<InlineSpan>),
    Italic(Vec<InlineSpan>),
    Link { href: String, label: Vec<InlineSpan> },
    Image { src: String, alt: String },
}

type Pass = fn(Vec<InlineSpan>) -> Vec<InlineSpan>;

/// Parse one line of raw (unescaped) text into inline spans.
pub fn parse_inline(raw: &str) -> Vec<InlineSpan> {
    let passes: [Pass; 5] = [code_pass, image_pass, link_pass, bold_pass, italic_pass];
    passes
        .into_iter()
        .fold(vec![InlineSpan::Text(escape_html(raw))], apply)
}

/// Render spans to HTML, appending to `out`.
pub fn write_spans(spans: &[InlineSpan], out: &mut String) {
    for span in spans {
        match span {
            InlineSpan::Text(text) => out.push_str(text),
            InlineSpan::Code(code) => {
                out.push_str("<code>");
                out.push_str(code);
                out.push_str("</code>");
            }
            InlineSpan::Bold(children) => {
                out.push_str("<strong>");
                write_spans(children, out);
                out.push_str("</strong>");
            }
            InlineSpan::Italic(children) => {
                out.push_str("<em>");
                write_spans(children, out);
                out.push_str("</em>");
            }
            InlineSpan::Link { href, label } => {
                out.push_str("<a href=\"");
                out.push_str(href);
                out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
                write_spans(label, out);
                out.push_str("</a>");
            }
            InlineSpan::Image { src, alt } => {
                out.push_str("<img src=\"");
                out.push_str(src);
                out.push_str("\" alt=\"");
                out.push_str(alt);
                out.push_str("\">");
            }
        }
    }
}

/// Parse and render one line of raw text.
///
/// ```
/// use tidbit::markdown::render_inline;
///
/// assert_eq!(render_inline("**hi** `x`"), "<strong>hi</strong> <code>x</code>");
/// ```
pub fn render_inline(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 16);
    write_spans(&parse_inline(raw), &mut out);
    out
}

/// Run `pass` inside existing container spans, then over the sequence itself.
///
/// Containers the pass creates are not revisited by it, so links never nest
/// and bold never nests in bold.
fn apply(spans: Vec<InlineSpan>, pass: Pass) -> Vec<InlineSpan> {
    let spans = spans
        .into_iter()
        .map(|span| match span {
            InlineSpan::Bold(children) => InlineSpan::Bold(apply(children, pass)),
            InlineSpan::Italic(children) => InlineSpan::Italic(apply(children, pass)),
            InlineSpan::Link { href, label } => InlineSpan::Link {
                href,
                label: apply(label, pass),
            },
            other => other,
        })
        .collect();
    pass(spans)
}

/// Non-text spans pinned to byte offsets of the joined text.
///
/// An atom at offset `o` sits between `text[..o]` and `text[o..]`.
struct Atoms {
    offsets: Vec<usize>,
    spans: vec::IntoIter<InlineSpan>,
}

/// Join the text runs of `spans`, pulling everything else out as atoms.
fn flatten(spans: Vec<InlineSpan>) -> (String, Atoms) {
    let mut text = String::new();
    let mut offsets = Vec::new();
    let mut atoms = Vec::new();
    for span in spans {
        match span {
            InlineSpan::Text(run) => text.push_str(&run),
            atom => {
                offsets.push(text.len());
                atoms.push(atom);
            }
        }
    }
    let atoms = Atoms {
        offsets,
        spans: atoms.into_iter(),
    };
    (text, atoms)
}

/// Rebuilds a span sequence from joined text, left to right.
struct Splitter<'a> {
    text: &'a str,
    atoms: Atoms,
    next_atom: usize,
    literal_start: usize,
    spans: Vec<InlineSpan>,
}

impl<'a> Splitter<'a> {
    fn new(text: &'a str, atoms: Atoms) -> Self {
        Self {
            text,
            atoms,
            next_atom: 0,
            literal_start: 0,
            spans: Vec::new(),
        }
    }

    /// Whether any atom sits at an offset in `range`.
    fn has_atom(&self, range: RangeInclusive<usize>) -> bool {
        let offsets = &self.atoms.offsets;
        let i = offsets.partition_point(|&o| o < *range.start());
        offsets.get(i).is_some_and(|&o| o <= *range.end())
    }

    /// First occurrence of `delim` at or after `from` with no atom splitting it.
    fn find_delim(&self, delim: &[u8], mut from: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        loop {
            let at = from + memmem::find(bytes.get(from..)?, delim)?;
            if !self.has_atom(at + 1..=at + delim.len() - 1) {
                return Some(at);
            }
            from = at + 1;
        }
    }

    /// Text and atoms between `start` and `end`, including atoms at `end`.
    fn take(&mut self, start: usize, end: usize) -> Vec<InlineSpan> {
        let mut out = Vec::new();
        let mut cursor = start;
        while let Some(&at) = self.atoms.offsets.get(self.next_atom).filter(|&&at| at <= end) {
            if at > cursor {
                out.push(InlineSpan::Text(self.text[cursor..at].to_string()));
                cursor = at;
            }
            out.extend(self.atoms.spans.next());
            self.next_atom += 1;
        }
        if end > cursor {
            out.push(InlineSpan::Text(self.text[cursor..end].to_string()));
        }
        out
    }

    fn flush_literal(&mut self, start: usize) {
        let literal = self.take(self.literal_start, start);
        self.spans.extend(literal);
    }

    /// Replace `start..end`, which holds no atoms, with `span`.
    fn replace(&mut self, start: usize, end: usize, span: InlineSpan) {
        self.flush_literal(start);
        self.spans.push(span);
        self.literal_start = end;
    }

    /// Replace `start..end` with `wrap` applied to the contents of `inner`.
    fn wrap(
        &mut self,
        start: usize,
        inner: Range<usize>,
        end: usize,
        wrap: impl FnOnce(Vec<InlineSpan>) -> InlineSpan,
    ) {
        self.flush_literal(start);
        let children = self.take(inner.start, inner.end);
        self.spans.push(wrap(children));
        self.literal_start = end;
    }

    fn finish(mut self) -> Vec<InlineSpan> {
        self.flush_literal(self.text.len());
        self.spans
    }
}

// All delimiters are ASCII, so every byte index found below is a char boundary.

fn code_pass(spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let (text, atoms) = flatten(spans);
    let bytes = text.as_bytes();
    let mut out = Splitter::new(&text, atoms);
    let mut pos = 0;

    while let Some(open) = memchr(b'`', &bytes[pos..]).map(|i| pos + i) {
        let Some(close) = memchr(b'`', &bytes[open + 1..]).map(|i| open + 1 + i) else {
            break;
        };
        if close == open + 1 || out.has_atom(open + 1..=close) {
            // Empty span; the second backtick may still open one.
            pos = open + 1;
            continue;
        }
        out.replace(open, close + 1, InlineSpan::Code(text[open + 1..close].to_string()));
        pos = close + 1;
    }
    out.finish()
}

/// `[label](target)` with the `[` at `open`.
struct Bracket {
    label: Range<usize>,
    target: Range<usize>,
    end: usize,
}

/// Match `[label](target)`; `label` holds no `]` and `target` is non-empty
/// with no `)`.
fn bracket_target(bytes: &[u8], open: usize) -> Option<Bracket> {
    let label_start = open + 1;
    let label_end = label_start + memchr(b']', &bytes[label_start..])?;
    if bytes.get(label_end + 1) != Some(&b'(') {
        return None;
    }
    let target_start = label_end + 2;
    let target_end = target_start + memchr(b')', &bytes[target_start..])?;
    if target_end == target_start {
        return None;
    }
    Some(Bracket {
        label: label_start..label_end,
        target: target_start..target_end,
        end: target_end + 1,
    })
}

fn image_pass(spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let (text, atoms) = flatten(spans);
    let bytes = text.as_bytes();
    let mut out = Splitter::new(&text, atoms);
    let mut pos = 0;

    while let Some(bang) = memchr(b'!', &bytes[pos..]).map(|i| pos + i) {
        if bytes.get(bang + 1) == Some(&b'[')
            && let Some(found) = bracket_target(bytes, bang + 1)
            && !out.has_atom(bang + 1..=found.end - 1)
        {
            let span = InlineSpan::Image {
                src: safe_url(&text[found.target]).to_string(),
                alt: text[found.label].to_string(),
            };
            out.replace(bang, found.end, span);
            pos = found.end;
        } else {
            pos = bang + 1;
        }
    }
    out.finish()
}

fn link_pass(spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let (text, atoms) = flatten(spans);
    let bytes = text.as_bytes();
    let mut out = Splitter::new(&text, atoms);
    let mut pos = 0;

    while let Some(open) = memchr(b'[', &bytes[pos..]).map(|i| pos + i) {
        match bracket_target(bytes, open) {
            // The label may hold atoms; `](`, the target and `)` may not.
            Some(found)
                if (!found.label.is_empty() || out.has_atom(found.label.start..=found.label.end))
                    && !out.has_atom(found.label.end + 1..=found.end - 1) =>
            {
                let href = safe_url(&text[found.target.clone()]).to_string();
                out.wrap(open, found.label, found.end, |label| InlineSpan::Link { href, label });
                pos = found.end;
            }
            _ => pos = open + 1,
        }
    }
    out.finish()
}

fn bold_pass(spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let (text, atoms) = flatten(spans);
    let mut out = Splitter::new(&text, atoms);
    let mut pos = 0;

    while let Some(open) = out.find_delim(b"**", pos) {
        // Non-greedy, at least one character or atom of content.
        let content_start = open + 2;
        let mut from = content_start;
        let close = loop {
            match out.find_delim(b"**", from) {
                Some(c) if c == content_start && !out.has_atom(c..=c) => from = c + 1,
                found => break found,
            }
        };
        let Some(close) = close else {
            break;
        };
        out.wrap(open, content_start..close, close + 2, InlineSpan::Bold);
        pos = close + 2;
    }
    out.finish()
}

fn italic_pass(spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let (text, atoms) = flatten(spans);
    let bytes = text.as_bytes();
    let mut out = Splitter::new(&text, atoms);
    let mut pos = 0;
    // End of the previous match; its characters cannot serve as the
    // non-underscore prefix of the next one.
    let mut last_end = 0;

    while let Some(open) = memchr(b'_', &bytes[pos..]).map(|i| pos + i) {
        let prefix_ok = open == 0
            || out.has_atom(open..=open)
            || (open > last_end && bytes[open - 1] != b'_');
        let Some(close) = memchr(b'_', &bytes[open + 1..]).map(|i| open + 1 + i) else {
            break;
        };
        if prefix_ok && (close > open + 1 || out.has_atom(open + 1..=close)) {
            out.wrap(open, open + 1..close, close + 1, InlineSpan::Italic);
            last_end = close + 1;
            pos = close + 1;
        } else {
            pos = open + 1;
        }
    }
    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> InlineSpan {
        InlineSpan::Text(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inline("hello"), vec![text("hello")]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_code_span() {
        assert_eq!(render_inline("`code`"), "<code>code</code>");
        assert_eq!(render_inline("a `b` c"), "a <code>b</code> c");
    }

    #[test]
    fn test_code_protects_emphasis() {
        assert_eq!(render_inline("`**x**`"), "<code>**x**</code>");
        assert_eq!(render_inline("`_x_`"), "<code>_x_</code>");
    }

    #[test]
    fn test_code_empty_and_unterminated() {
        assert_eq!(render_inline("``a`"), "`<code>a</code>");
        assert_eq!(render_inline("`open"), "`open");
        assert_eq!(render_inline("``"), "``");
    }

    #[test]
    fn test_code_escapes_html() {
        assert_eq!(render_inline("`<b>`"), "<code>&lt;b&gt;</code>");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            render_inline("![cat](https://x.test/c.png)"),
            "<img src=\"https://x.test/c.png\" alt=\"cat\">"
        );
        assert_eq!(
            render_inline("![](http://x.test/a.png)"),
            "<img src=\"http://x.test/a.png\" alt=\"\">"
        );
    }

    #[test]
    fn test_image_bad_scheme() {
        assert_eq!(
            render_inline("![x](javascript:alert(1))"),
            "<img src=\"#\" alt=\"x\">)"
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render_inline("[site](https://example.com)"),
            "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">site</a>"
        );
    }

    #[test]
    fn test_link_scheme_guard() {
        let html = render_inline("[x](javascript:alert(1))");
        assert!(html.starts_with("<a href=\"#\""));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn test_link_query_is_escaped() {
        let html = render_inline("[q](https://a.test/?x=1&y=\"2\")");
        assert!(html.contains("href=\"https://a.test/?x=1&amp;y=&quot;2&quot;\""));
    }

    #[test]
    fn test_link_url_not_rewritten_by_emphasis() {
        let html = render_inline("[a](https://x.test/_a_b_/**c**)");
        assert!(html.contains("href=\"https://x.test/_a_b_/**c**\""));
    }

    #[test]
    fn test_link_label_gets_emphasis() {
        assert_eq!(
            render_inline("[**big**](http://a.test)"),
            "<a href=\"http://a.test\" target=\"_blank\" rel=\"noopener noreferrer\"><strong>big</strong></a>"
        );
    }

    #[test]
    fn test_empty_label_not_a_link() {
        assert_eq!(render_inline("[](http://a.test)"), "[](http://a.test)");
    }

    #[test]
    fn test_unterminated_bracket() {
        assert_eq!(render_inline("[oops"), "[oops");
        assert_eq!(render_inline("[a](b"), "[a](b");
        assert_eq!(render_inline("[a] (b)"), "[a] (b)");
    }

    #[test]
    fn test_image_wins_over_link() {
        let html = render_inline("![a](http://i.test/p.png)");
        assert!(html.starts_with("<img"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_bold() {
        assert_eq!(render_inline("**b**"), "<strong>b</strong>");
        assert_eq!(
            render_inline("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
        assert_eq!(render_inline("****"), "****");
        assert_eq!(render_inline("**open"), "**open");
    }

    #[test]
    fn test_bold_non_greedy_with_star_content() {
        assert_eq!(render_inline("***x**"), "<strong>*x</strong>");
    }

    #[test]
    fn test_italic_underscore_only() {
        assert_eq!(render_inline("_i_"), "<em>i</em>");
        assert_eq!(render_inline("*i*"), "*i*");
    }

    #[test]
    fn test_italic_needs_non_underscore_prefix() {
        assert_eq!(render_inline("__x__"), "__x__");
        assert_eq!(render_inline("a _b_ c"), "a <em>b</em> c");
        assert_eq!(render_inline("_a__b_"), "<em>a</em>_b_");
    }

    #[test]
    fn test_snake_case_identifiers() {
        assert_eq!(render_inline("foo_bar_baz"), "foo<em>bar</em>baz");
    }

    #[test]
    fn test_italic_inside_bold() {
        assert_eq!(
            render_inline("**_x_**"),
            "<strong><em>x</em></strong>"
        );
    }

    #[test]
    fn test_linked_image() {
        assert_eq!(
            render_inline("[![build](https://ci.test/b.svg)](https://ci.test)"),
            "<a href=\"https://ci.test\" target=\"_blank\" rel=\"noopener noreferrer\">\
             <img src=\"https://ci.test/b.svg\" alt=\"build\"></a>"
        );
    }

    #[test]
    fn test_code_inside_link_label() {
        assert_eq!(
            render_inline("[the `x` fn](https://d.test)"),
            "<a href=\"https://d.test\" target=\"_blank\" rel=\"noopener noreferrer\">\
             the <code>x</code> fn</a>"
        );
    }

    #[test]
    fn test_emphasis_around_code() {
        assert_eq!(
            render_inline("**run `make` now**"),
            "<strong>run <code>make</code> now</strong>"
        );
        assert_eq!(render_inline("**`x`**"), "<strong><code>x</code></strong>");
        assert_eq!(render_inline("_see `x`_"), "<em>see <code>x</code></em>");
    }

    #[test]
    fn test_bold_around_link() {
        assert_eq!(
            render_inline("**[a](http://h.test)**"),
            "<strong><a href=\"http://h.test\" target=\"_blank\" rel=\"noopener noreferrer\">a</a></strong>"
        );
    }

    #[test]
    fn test_code_in_target_blocks_link() {
        assert_eq!(
            render_inline("[a](http://h.test/`x`)"),
            "[a](http://h.test/<code>x</code>)"
        );
    }

    #[test]
    fn test_delimiter_split_by_code_is_literal() {
        assert_eq!(render_inline("*`x`*b**"), "*<code>x</code>*b**");
    }

    #[test]
    fn test_cross_span_tree() {
        assert_eq!(
            parse_inline("**a `b`**"),
            vec![InlineSpan::Bold(vec![
                text("a "),
                InlineSpan::Code("b".to_string()),
            ])]
        );
    }

    #[test]
    fn test_injection_escaped() {
        assert_eq!(
            render_inline("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        let html = render_inline("![x\" onerror=\"alert(1)](http://a.test)");
        assert!(!html.contains("\" onerror"));
    }
}
