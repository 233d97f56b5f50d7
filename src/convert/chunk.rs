/// Notion rejects rich-text runs longer than this many UTF-16 code units.
pub const MAX_RUN_CHARS: usize = 2000;

/// Slice `text` into consecutive runs of at most `max` UTF-16 code units.
///
/// Always returns at least one run so the owning block has something to render;
/// empty input yields a single empty run. A character is never split, so a run
/// ends early rather than cut a surrogate pair.
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    if text.is_empty() || max == 0 {
        return vec![text.to_string()];
    }

    let mut runs = Vec::with_capacity(text.len() / max + 1);
    let mut start = 0;
    let mut units = 0;
    for (i, c) in text.char_indices() {
        let width = c.len_utf16();
        if units > 0 && units + width > max {
            runs.push(text[start..i].to_string());
            start = i;
            units = 0;
        }
        units += width;
    }
    runs.push(text[start..].to_string());
    runs
}
