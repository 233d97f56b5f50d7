pub mod blocks;
pub mod chunk;
pub mod markup;

pub use blocks::ContentBlock;

/// Four-pass pipeline: code extraction → list extraction → normalization → blocks.
///
/// Total and pure: malformed markup degrades to plain text, empty input gives
/// no blocks. Side-lists live only for the duration of the call.
pub fn convert(html: &str) -> Vec<ContentBlock> {
    if html.is_empty() {
        return Vec::new();
    }
    let marked = markup::mark_up(html);
    blocks::assemble(&marked)
}

pub use markup::plain_text;
