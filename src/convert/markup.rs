use std::sync::LazyLock;

use regex::{Captures, Regex};

static PRE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").unwrap());
static CODE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<code[^>]*>(.*?)</code>").unwrap());
static LI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap());
static LIST_CONTAINER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?[uo]l[^>]*>").unwrap());
static P_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</p>").unwrap());
static P_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<p[^>]*>").unwrap());
static DIV_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</div>").unwrap());
static DIV_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<div[^>]*>").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static LI_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</li>").unwrap());
static LI_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li>").unwrap());
static HEADING_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</h[1-6]>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(amp|lt|gt|quot|nbsp|#\d+);").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Sentinels bracketing a placeholder. Private-use code points, removed from the
/// input up front, so page text can never forge a marker.
pub const MARK_OPEN: char = '\u{E000}';
pub const MARK_CLOSE: char = '\u{E001}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Code,
    ListItem,
}

impl MarkerKind {
    pub fn tag(self) -> &'static str {
        match self {
            MarkerKind::Code => "CODE_BLOCK",
            MarkerKind::ListItem => "LIST_ITEM",
        }
    }
}

pub fn marker(kind: MarkerKind, index: usize) -> String {
    format!("{MARK_OPEN}{}_{index}{MARK_CLOSE}", kind.tag())
}

/// Output of the markup passes: normalized text holding placeholders, plus the
/// side-lists the placeholders index into.
#[derive(Debug, Default)]
pub struct Marked {
    pub text: String,
    pub code_blocks: Vec<String>,
    pub list_items: Vec<String>,
}

/// Run the three markup passes: code extraction, list extraction, normalization.
pub fn mark_up(html: &str) -> Marked {
    let mut marked = Marked::default();
    let input = html.replace([MARK_OPEN, MARK_CLOSE], "");

    let text = extract_code_blocks(&input, &mut marked.code_blocks);
    let text = extract_list_items(&text, &mut marked.list_items);
    marked.text = normalize(&text);
    marked
}

/// Pass 1: `<pre>` regions → code side-list. Runs before list extraction so
/// `<li>`-looking text inside code is left alone.
fn extract_code_blocks(html: &str, code_blocks: &mut Vec<String>) -> String {
    PRE_RE
        .replace_all(html, |caps: &Captures| {
            let unwrapped = CODE_TAG_RE.replace_all(&caps[1], "${1}");
            let stripped = TAG_RE.replace_all(&unwrapped, "");
            code_blocks.push(decode_entities(stripped.trim()));
            marker(MarkerKind::Code, code_blocks.len() - 1)
        })
        .into_owned()
}

/// Pass 2: `<li>` regions → list side-list; empty items vanish entirely.
fn extract_list_items(text: &str, list_items: &mut Vec<String>) -> String {
    let replaced = LI_RE.replace_all(text, |caps: &Captures| {
        let stripped = TAG_RE.replace_all(&caps[1], "");
        let item = stripped.trim();
        if item.is_empty() {
            return String::new();
        }
        list_items.push(decode_entities(item));
        format!("{}\n", marker(MarkerKind::ListItem, list_items.len() - 1))
    });
    LIST_CONTAINER_RE.replace_all(&replaced, "").into_owned()
}

/// Pass 3: block-level tags to newlines, drop the rest, decode, collapse.
fn normalize(text: &str) -> String {
    let text = P_CLOSE_RE.replace_all(text, "\n\n");
    let text = P_OPEN_RE.replace_all(&text, "");
    let text = DIV_CLOSE_RE.replace_all(&text, "\n");
    let text = DIV_OPEN_RE.replace_all(&text, "");
    let text = BR_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_string()
}

/// Decode the handful of entities problem pages use, plus decimal references.
///
/// Single pass, so `&amp;lt;` decodes to the literal `&lt;`. Unknown or invalid
/// references are left as written.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let decoded = match &caps[1] {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "nbsp" => Some(' '),
                num => num
                    .strip_prefix('#')
                    .and_then(|d| d.parse::<u32>().ok())
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Flatten a description to plain text, lists rendered as `- ` lines.
pub fn plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let text = BR_RE.replace_all(html, "\n");
    let text = P_CLOSE_RE.replace_all(&text, "\n\n");
    let text = DIV_CLOSE_RE.replace_all(&text, "\n");
    let text = LI_CLOSE_RE.replace_all(&text, "\n");
    let text = LI_OPEN_RE.replace_all(&text, "- ");
    let text = HEADING_CLOSE_RE.replace_all(&text, "\n\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_table() {
        assert_eq!(decode_entities("&amp;&lt;&gt;&quot;&#39;&nbsp;"), "&<>\"' ");
    }

    #[test]
    fn numeric_reference() {
        assert_eq!(decode_entities("&#8804; &#65;"), "≤ A");
    }

    #[test]
    fn invalid_numeric_reference_kept() {
        assert_eq!(decode_entities("&#55296;"), "&#55296;");
    }

    #[test]
    fn no_double_decoding() {
        // A chained replace would turn these into `<` and `"`.
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&amp;quot;"), "&quot;");
    }

    #[test]
    fn code_extracted_before_lists() {
        let m = mark_up("<pre><code>&lt;li&gt;x&lt;/li&gt;\n<li>y</li></code></pre>");
        assert_eq!(m.code_blocks, vec!["<li>x</li>\ny"]);
        assert!(m.list_items.is_empty());
        assert_eq!(m.text, marker(MarkerKind::Code, 0));
    }

    #[test]
    fn empty_list_item_dropped() {
        let m = mark_up("<ul><li>A</li><li> <b></b> </li><li>B</li></ul>");
        assert_eq!(m.list_items, vec!["A", "B"]);
        assert!(!m.text.contains("ul"));
    }

    #[test]
    fn list_item_with_attributes() {
        let m = mark_up(r#"<ol class="steps"><li data-x="1"><code>nums[i]</code> &gt; 0</li></ol>"#);
        assert_eq!(m.list_items, vec!["nums[i] > 0"]);
    }

    #[test]
    fn blank_runs_collapse() {
        let m = mark_up("<p>a</p>\n\n\n\n<p>b</p>");
        assert_eq!(m.text, "a\n\nb");
    }

    #[test]
    fn forged_marker_stripped() {
        let forged = marker(MarkerKind::Code, 0);
        let m = mark_up(&format!("<p>{forged}</p>"));
        assert_eq!(m.text, "CODE_BLOCK_0");
    }

    #[test]
    fn div_and_paragraph_attributes() {
        let m = mark_up("<div class=\"x\">a</div><div>b</div><p class=\"y\">c</p>d");
        assert_eq!(m.text, "a\nb\nc\n\nd");
    }

    #[test]
    fn br_variants() {
        let m = mark_up("a<br>b<BR/>c<br />d");
        assert_eq!(m.text, "a\nb\nc\nd");
    }

    #[test]
    fn plain_text_lists_and_headings() {
        let text = plain_text("<h3>Notes</h3><ul><li>one</li><li>two</li></ul>");
        assert_eq!(text, "Notes\n\n- one\n- two");
    }

    #[test]
    fn plain_text_empty() {
        assert_eq!(plain_text(""), "");
    }
}
