use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::chunk::{MAX_RUN_CHARS, chunk_text};
use super::markup::{MARK_CLOSE, MARK_OPEN, Marked, MarkerKind};

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{MARK_OPEN}(CODE_BLOCK|LIST_ITEM)_(\\d+){MARK_CLOSE}")).unwrap()
});

/// Language tag for code lifted out of a problem description.
pub const PLAIN_TEXT: &str = "plain text";

/// A typed unit of page content. Text payloads are stored as runs already cut
/// to the rich-text length limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { text: String },
    Paragraph { runs: Vec<String> },
    CodeBlock { runs: Vec<String>, language: String },
    BulletItem { runs: Vec<String> },
    Divider,
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>) -> Self {
        ContentBlock::Heading { text: text.into() }
    }

    pub fn paragraph(text: &str) -> Self {
        ContentBlock::Paragraph {
            runs: chunk_text(text, MAX_RUN_CHARS),
        }
    }

    pub fn code(text: &str, language: impl Into<String>) -> Self {
        ContentBlock::CodeBlock {
            runs: chunk_text(text, MAX_RUN_CHARS),
            language: language.into(),
        }
    }

    pub fn bullet(text: &str) -> Self {
        ContentBlock::BulletItem {
            runs: chunk_text(text, MAX_RUN_CHARS),
        }
    }

    /// Runs joined back into one string.
    pub fn text(&self) -> String {
        match self {
            ContentBlock::Heading { text } => text.clone(),
            ContentBlock::Paragraph { runs }
            | ContentBlock::CodeBlock { runs, .. }
            | ContentBlock::BulletItem { runs } => runs.concat(),
            ContentBlock::Divider => String::new(),
        }
    }
}

/// Pass 4: walk the marked-up text line by line, accumulating paragraph text
/// and resolving placeholders against the side-lists.
pub fn assemble(marked: &Marked) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut paragraph = String::new();

    for line in marked.text.split('\n') {
        let line = line.trim();

        if line.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        // A marker line is consumed whole: surrounding text is dropped, markers
        // emit in order.
        let mut markers = MARKER_RE.captures_iter(line).peekable();
        if markers.peek().is_none() {
            push_text(&mut paragraph, line);
            continue;
        }

        flush(&mut paragraph, &mut blocks);
        for caps in markers {
            let kind = if &caps[1] == MarkerKind::Code.tag() {
                MarkerKind::Code
            } else {
                MarkerKind::ListItem
            };
            let index = caps[2].parse::<usize>().ok();
            if let Some(block) = index.and_then(|i| resolve(marked, kind, i)) {
                blocks.push(block);
            }
        }
    }
    flush(&mut paragraph, &mut blocks);

    if blocks.is_empty() && !marked.text.is_empty() {
        blocks.push(ContentBlock::paragraph(&marked.text));
    }

    blocks
}

fn resolve(marked: &Marked, kind: MarkerKind, index: usize) -> Option<ContentBlock> {
    match kind {
        MarkerKind::Code => marked
            .code_blocks
            .get(index)
            .filter(|code| !code.is_empty())
            .map(|code| ContentBlock::code(code, PLAIN_TEXT)),
        MarkerKind::ListItem => marked.list_items.get(index).map(|item| ContentBlock::bullet(item)),
    }
}

fn push_text(paragraph: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !paragraph.is_empty() {
        paragraph.push(' ');
    }
    paragraph.push_str(text);
}

fn flush(paragraph: &mut String, blocks: &mut Vec<ContentBlock>) {
    if paragraph.is_empty() {
        return;
    }
    blocks.push(ContentBlock::paragraph(paragraph.trim()));
    paragraph.clear();
}
