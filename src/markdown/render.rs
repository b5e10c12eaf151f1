//! Line-oriented block rendering.
//!
//! Each input line is classified into a [`Block`], then folded through a
//! small state machine that tracks which container (list, quote, code fence)
//! is open. No I/O is performed here.

use super::escape::escape_html;
use super::inline::{parse_inline, write_spans};

/// Kind of list a list item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Classification of a single input line (outside a code fence).
///
/// Text payloads are the raw remainder after the block marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Paragraph(&'a str),
    ListItem { kind: ListKind, text: &'a str },
    Blockquote(&'a str),
    /// Fence delimiter; `info` is whatever follows the backticks.
    CodeFence { info: &'a str },
    HorizontalRule,
    Blank,
}

/// Open container between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    /// `empty` is true until the first code line is written.
    InCodeFence { empty: bool },
    InUnorderedList,
    InOrderedList,
    InBlockquote,
}

const FENCE: &str = "```";

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

/// `rest` starts with whitespace (the separator after a block marker).
fn starts_with_space(rest: &str) -> bool {
    rest.chars().next().is_some_and(char::is_whitespace)
}

fn is_rule(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 3 && t.bytes().all(|b| b == b'-')
}

fn quote_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    (rest.is_empty() || starts_with_space(rest)).then(|| rest.trim())
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    let rest = &line[level..];
    ((1..=6).contains(&level) && starts_with_space(rest)).then(|| (level as u8, rest.trim()))
}

fn unordered_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(['-', '*'])?;
    starts_with_space(rest).then(|| rest.trim())
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    starts_with_space(rest).then(|| rest.trim())
}

/// Classify one line. First matching rule wins.
///
/// ```
/// use tidbit::markdown::{Block, classify_line};
///
/// assert_eq!(classify_line("## Title"), Block::Heading { level: 2, text: "Title" });
/// assert_eq!(classify_line(" --- "), Block::HorizontalRule);
/// ```
pub fn classify_line(line: &str) -> Block<'_> {
    if is_fence(line) {
        let info = line.trim_start()[FENCE.len()..].trim();
        return Block::CodeFence { info };
    }
    if is_rule(line) {
        return Block::HorizontalRule;
    }
    if let Some(text) = quote_text(line) {
        return Block::Blockquote(text);
    }
    if let Some((level, text)) = heading(line) {
        return Block::Heading { level, text };
    }
    if let Some(text) = unordered_item(line) {
        return Block::ListItem {
            kind: ListKind::Unordered,
            text,
        };
    }
    if let Some(text) = ordered_item(line) {
        return Block::ListItem {
            kind: ListKind::Ordered,
            text,
        };
    }
    if line.trim().is_empty() {
        return Block::Blank;
    }
    Block::Paragraph(line.trim())
}

/// Language class for a fence info string, if it is a plain identifier.
fn fence_language(info: &str) -> Option<&str> {
    let ok = !info.is_empty()
        && info
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-'));
    if !ok && !info.is_empty() {
        tracing::trace!(info, "ignoring fence info string");
    }
    ok.then_some(info)
}

/// Render state folded over input lines.
pub struct RenderContext {
    state: State,
    output: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            output: String::new(),
        }
    }

    /// Feed one input line.
    pub fn step(mut self, line: &str) -> Self {
        if let State::InCodeFence { empty } = self.state {
            if is_fence(line) {
                self.close_open();
            } else {
                if !empty {
                    self.output.push('\n');
                }
                self.output.push_str(&escape_html(line));
                self.state = State::InCodeFence { empty: false };
            }
            return self;
        }

        match classify_line(line) {
            Block::CodeFence { info } => {
                self.close_open();
                match fence_language(info) {
                    Some(lang) => {
                        self.output.push_str("<pre><code class=\"language-");
                        self.output.push_str(lang);
                        self.output.push_str("\">");
                    }
                    None => self.output.push_str("<pre><code>"),
                }
                self.state = State::InCodeFence { empty: true };
            }
            Block::HorizontalRule => {
                self.close_open();
                self.output.push_str("<hr>\n");
            }
            Block::Blockquote(text) => {
                self.open(State::InBlockquote, "<blockquote>\n");
                self.wrap_inline("p", text);
            }
            Block::Heading { level, text } => {
                self.close_open();
                self.wrap_inline(&format!("h{level}"), text);
            }
            Block::ListItem { kind, text } => {
                match kind {
                    ListKind::Unordered => self.open(State::InUnorderedList, "<ul>\n"),
                    ListKind::Ordered => self.open(State::InOrderedList, "<ol>\n"),
                }
                self.wrap_inline("li", text);
            }
            Block::Blank => {
                self.close_open();
                self.output.push_str("<br>\n");
            }
            Block::Paragraph(text) => {
                self.close_open();
                self.wrap_inline("p", text);
            }
        }
        self
    }

    /// Close anything still open and return the HTML.
    pub fn finish(mut self) -> String {
        if matches!(self.state, State::InCodeFence { .. }) {
            tracing::debug!("unterminated code fence closed at end of input");
        }
        self.close_open();
        self.output
    }

    /// Enter `state` unless already in it, closing the previous container.
    fn open(&mut self, state: State, tag: &str) {
        if self.state != state {
            self.close_open();
            self.output.push_str(tag);
            self.state = state;
        }
    }

    fn close_open(&mut self) {
        let close = match self.state {
            State::Normal => return,
            State::InCodeFence { .. } => "</code></pre>\n",
            State::InUnorderedList => "</ul>\n",
            State::InOrderedList => "</ol>\n",
            State::InBlockquote => "</blockquote>\n",
        };
        self.output.push_str(close);
        self.state = State::Normal;
    }

    fn wrap_inline(&mut self, tag: &str, text: &str) {
        self.output.push('<');
        self.output.push_str(tag);
        self.output.push('>');
        write_spans(&parse_inline(text), &mut self.output);
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push_str(">\n");
    }
}

/// Render markdown text to HTML safe to insert into a document body.
///
/// Total over all inputs: malformed syntax degrades to escaped literal text
/// and open containers are closed at the end.
///
/// ```
/// use tidbit::markdown::render_markdown;
///
/// assert_eq!(
///     render_markdown("# Hello\n\nWorld"),
///     "<h1>Hello</h1>\n<br>\n<p>World</p>\n"
/// );
/// ```
pub fn render_markdown(text: &str) -> String {
    text.lines()
        .fold(RenderContext::new(), RenderContext::step)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_headings() {
        assert_eq!(classify_line("# a"), Block::Heading { level: 1, text: "a" });
        assert_eq!(classify_line("###### f"), Block::Heading { level: 6, text: "f" });
        assert_eq!(classify_line("####### g"), Block::Paragraph("####### g"));
        assert_eq!(classify_line("#nospace"), Block::Paragraph("#nospace"));
        assert_eq!(classify_line("#"), Block::Paragraph("#"));
    }

    #[test]
    fn test_classify_lists() {
        assert_eq!(
            classify_line("- a"),
            Block::ListItem { kind: ListKind::Unordered, text: "a" }
        );
        assert_eq!(
            classify_line("* b"),
            Block::ListItem { kind: ListKind::Unordered, text: "b" }
        );
        assert_eq!(
            classify_line("12. c"),
            Block::ListItem { kind: ListKind::Ordered, text: "c" }
        );
        assert_eq!(classify_line("12.c"), Block::Paragraph("12.c"));
        assert_eq!(classify_line("-a"), Block::Paragraph("-a"));
    }

    #[test]
    fn test_classify_rules_and_quotes() {
        assert_eq!(classify_line("---"), Block::HorizontalRule);
        assert_eq!(classify_line("  ------  "), Block::HorizontalRule);
        assert_eq!(classify_line("--"), Block::Paragraph("--"));
        assert_eq!(classify_line("> q"), Block::Blockquote("q"));
        assert_eq!(classify_line(">"), Block::Blockquote(""));
        assert_eq!(classify_line(">q"), Block::Paragraph(">q"));
    }

    #[test]
    fn test_classify_blank_and_fence() {
        assert_eq!(classify_line(""), Block::Blank);
        assert_eq!(classify_line(" \t "), Block::Blank);
        assert_eq!(classify_line("```rust"), Block::CodeFence { info: "rust" });
        assert_eq!(classify_line("  ```"), Block::CodeFence { info: "" });
    }

    #[test]
    fn test_heading_then_paragraph() {
        let html = render_markdown("# Hello\n\nWorld");
        assert_eq!(html.matches("<h1>").count(), 1);
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_inline_code_line() {
        assert_eq!(render_markdown("`code`"), "<p><code>code</code></p>\n");
    }

    #[test]
    fn test_list_items_merge() {
        assert_eq!(
            render_markdown("- a\n- b"),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_list_kind_switch() {
        assert_eq!(
            render_markdown("- a\n1. b"),
            "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_blank_splits_lists() {
        let html = render_markdown("- a\n\n- b");
        assert_eq!(html.matches("<ul>").count(), 2);
        assert!(html.contains("</ul>\n<br>\n<ul>"));
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            render_markdown("> one\n> two\nafter"),
            "<blockquote>\n<p>one</p>\n<p>two</p>\n</blockquote>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_rule_closes_list() {
        assert_eq!(
            render_markdown("- a\n---"),
            "<ul>\n<li>a</li>\n</ul>\n<hr>\n"
        );
    }

    #[test]
    fn test_code_fence() {
        assert_eq!(
            render_markdown("```\n# not heading\n<b>\n```"),
            "<pre><code># not heading\n&lt;b&gt;</code></pre>\n"
        );
    }

    #[test]
    fn test_code_fence_language() {
        assert_eq!(
            render_markdown("```rust\nfn x() {}\n```"),
            "<pre><code class=\"language-rust\">fn x() {}</code></pre>\n"
        );
        assert!(render_markdown("```\" onclick=\"x\nfoo\n```").starts_with("<pre><code>foo"));
    }

    #[test]
    fn test_code_fence_keeps_blank_lines_and_markers() {
        assert_eq!(
            render_markdown("```\na\n\n- b\n```"),
            "<pre><code>a\n\n- b</code></pre>\n"
        );
    }

    #[test]
    fn test_unterminated_fence_auto_closes() {
        assert_eq!(
            render_markdown("- item\n```\ncode"),
            "<ul>\n<li>item</li>\n</ul>\n<pre><code>code</code></pre>\n"
        );
    }

    #[test]
    fn test_open_list_closes_at_end() {
        assert!(render_markdown("1. x").ends_with("</ol>\n"));
        assert!(render_markdown("> x").ends_with("</blockquote>\n"));
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(render_markdown(""), "");
        assert_eq!(render_markdown("   "), "<br>\n");
    }

    #[test]
    fn test_script_injection() {
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_escapes_exactly_once() {
        assert_eq!(render_markdown("a & b"), "<p>a &amp; b</p>\n");
        assert_eq!(render_markdown("&amp;"), "<p>&amp;amp;</p>\n");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(render_markdown("- a\r\n- b\r\n"), render_markdown("- a\n- b"));
    }

    proptest! {
        #[test]
        fn prop_never_emits_raw_script(s in ".*") {
            let html = render_markdown(&format!("{s}<script>{s}"));
            prop_assert!(!html.contains("<script"));
        }

        #[test]
        fn prop_total_over_arbitrary_input(s in "[-#>*_`!\\[\\]()a-z0-9 .\n]*") {
            let html = render_markdown(&s);
            let opens = html.matches("<ul>").count() + html.matches("<ol>").count()
                + html.matches("<blockquote>").count() + html.matches("<pre>").count();
            let closes = html.matches("</ul>").count() + html.matches("</ol>").count()
                + html.matches("</blockquote>").count() + html.matches("</pre>").count();
            prop_assert_eq!(opens, closes);
        }
    }
}
