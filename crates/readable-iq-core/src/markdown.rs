//! Markdown to prose.
//!
//! Readability formulas only make sense over running prose, so markdown input
//! is parsed with pulldown-cmark and reduced to the text a reader would
//! actually read as sentences.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Reduce markdown to plain prose.
///
/// Code (fenced, indented and inline), headings, tables, images, raw HTML and
/// YAML frontmatter are dropped. Link text, emphasis, list items and
/// blockquotes are kept without their markup. Paragraphs and list items end
/// with a newline.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn strip_to_prose(text: &str) -> String {
    let body = strip_frontmatter(text);
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;

    let mut prose = String::with_capacity(body.len());
    let mut hidden: usize = 0;

    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(
                Tag::CodeBlock(_) | Tag::Heading { .. } | Tag::Table(_) | Tag::Image { .. },
            ) => hidden += 1,
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_) | TagEnd::Table | TagEnd::Image) => {
                hidden = hidden.saturating_sub(1);
            }
            Event::Text(t) if hidden == 0 => prose.push_str(&t),
            Event::SoftBreak | Event::HardBreak if hidden == 0 => prose.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item) if hidden == 0 => prose.push('\n'),
            _ => {}
        }
    }

    prose.trim().to_string()
}

/// Drop a leading `---` delimited YAML block.
fn strip_frontmatter(text: &str) -> &str {
    let Some(rest) = text.trim_start().strip_prefix("---\n") else {
        return text;
    };
    match rest.find("\n---") {
        Some(close) => rest[close + 4..]
            .split_once('\n')
            .map_or("", |(_, body)| body),
        None => text,
    }
}
