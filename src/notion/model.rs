use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::convert::ContentBlock;

// ── Outgoing ──

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotations {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

/// One `rich_text` run of type `text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: TextContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        RichText {
            kind: "text",
            text: TextContent {
                content: content.into(),
                link: None,
            },
            annotations: None,
        }
    }

    pub fn linked(mut self, url: impl Into<String>) -> Self {
        self.text.link = Some(Link { url: url.into() });
        self
    }

    pub fn italic_gray(mut self) -> Self {
        let a = self.annotations.get_or_insert_with(Annotations::default);
        a.italic = true;
        a.color = Some("gray".into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.annotations.get_or_insert_with(Annotations::default).bold = true;
        self
    }
}

pub fn runs(texts: &[String]) -> Vec<RichText> {
    texts.iter().map(|t| RichText::plain(t.as_str())).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBody {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBody {
    pub rich_text: Vec<RichText>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyBody {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum BlockBody {
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBody },
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBody },
    #[serde(rename = "code")]
    Code { code: CodeBody },
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: TextBody },
    #[serde(rename = "divider")]
    Divider { divider: EmptyBody },
}

/// A block as the API expects it: `{"object":"block","type":T,T:{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    object: &'static str,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl Block {
    fn new(body: BlockBody) -> Self {
        Block {
            object: "block",
            body,
        }
    }

    pub fn heading(rich_text: Vec<RichText>) -> Self {
        Block::new(BlockBody::Heading2 {
            heading_2: TextBody { rich_text },
        })
    }

    pub fn paragraph(rich_text: Vec<RichText>) -> Self {
        Block::new(BlockBody::Paragraph {
            paragraph: TextBody { rich_text },
        })
    }

    pub fn code(rich_text: Vec<RichText>, language: impl Into<String>) -> Self {
        Block::new(BlockBody::Code {
            code: CodeBody {
                rich_text,
                language: language.into(),
            },
        })
    }

    pub fn bullet(rich_text: Vec<RichText>) -> Self {
        Block::new(BlockBody::BulletedListItem {
            bulleted_list_item: TextBody { rich_text },
        })
    }

    pub fn divider() -> Self {
        Block::new(BlockBody::Divider {
            divider: EmptyBody {},
        })
    }
}

impl From<&ContentBlock> for Block {
    fn from(block: &ContentBlock) -> Self {
        match block {
            ContentBlock::Heading { text } => Block::heading(vec![RichText::plain(text.as_str())]),
            ContentBlock::Paragraph { runs: r } => Block::paragraph(runs(r)),
            ContentBlock::CodeBlock { runs: r, language } => Block::code(runs(r), language.as_str()),
            ContentBlock::BulletItem { runs: r } => Block::bullet(runs(r)),
            ContentBlock::Divider => Block::divider(),
        }
    }
}

impl From<ContentBlock> for Block {
    fn from(block: ContentBlock) -> Self {
        Block::from(&block)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateValue {
    pub start: String,
}

/// A page property value, serialized as `{"<type>": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Select(SelectOption),
    MultiSelect(Vec<SelectOption>),
    Date(DateValue),
    Url(String),
}

impl PropertyValue {
    /// The schema type name this value needs on the database side.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Date(_) => "date",
            PropertyValue::Url(_) => "url",
        }
    }

    pub fn select(name: impl Into<String>) -> Self {
        PropertyValue::Select(SelectOption { name: name.into() })
    }

    pub fn text(content: impl Into<String>) -> Self {
        PropertyValue::RichText(vec![RichText::plain(content)])
    }
}

pub type Properties = BTreeMap<String, PropertyValue>;

// ── Incoming ──

#[derive(Debug, Clone, Deserialize)]
pub struct PlainText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

impl PageObject {
    pub fn select(&self, property: &str) -> Option<&str> {
        self.properties.get(property)?.get("select")?.get("name")?.as_str()
    }

    pub fn date_start(&self, property: &str) -> Option<&str> {
        self.properties.get(property)?.get("date")?.get("start")?.as_str()
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<PageObject>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub title: Vec<PlainText>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaProperty>,
}

impl DatabaseObject {
    pub fn display_title(&self) -> &str {
        self.title
            .first()
            .map(|t| t.plain_text.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled")
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<DatabaseObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichTextPayload {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub heading_2: Option<RichTextPayload>,
}

#[derive(Debug, Deserialize)]
pub struct BlockList {
    pub results: Vec<BlockObject>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
