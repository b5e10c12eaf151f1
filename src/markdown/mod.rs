//! Markdown to HTML rendering for the previewer widget.
//!
//! A small, line-oriented dialect, rendered in one pass:
//!
//! - [`escape`]: HTML escaping and the `http`/`https` URL guard
//! - [`inline`]: code, image, link, bold and italic spans
//! - [`render`]: block classification and the container state machine
//!
//! ## Design Notes
//!
//! - **Escape first**: every line is HTML-escaped exactly once before any
//!   inline rule runs, so the only tags in the output are ones the renderer
//!   wrote itself. The result is safe to insert into a document body.
//! - **Ordered inline passes**: code spans are resolved before emphasis, so
//!   `` `**x**` `` renders as code. Later passes never see the contents of
//!   spans produced by earlier ones.
//! - **Underscore italics only**: `_x_` is italic, `*x*` is literal text.
//! - **No failure mode**: unbalanced markers stay literal and open containers
//!   are closed at end of input.

mod escape;
mod inline;
mod render;

pub use escape::{escape_html, safe_url};
pub use inline::{InlineSpan, parse_inline, render_inline, write_spans};
pub use render::{Block, ListKind, RenderContext, classify_line, render_markdown};
