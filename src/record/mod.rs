pub mod children;
pub mod language;
pub mod properties;
pub mod related;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::notion::model::{Block, Properties};

#[derive(Debug, Clone, Deserialize)]
pub struct TopicTag {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub question_frontend_id: String,
    pub title: String,
    pub difficulty: String,
    /// Description HTML.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
    /// JSON-encoded string or an array, depending on where it was captured.
    #[serde(default)]
    pub similar_questions: Option<Value>,
}

impl Problem {
    pub fn display_title(&self) -> String {
        format!("{}. {}", self.question_frontend_id, self.title)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub runtime_display: Option<String>,
    pub runtime_percentile: Option<f64>,
    pub memory_display: Option<String>,
    pub memory_percentile: Option<f64>,
}

/// Everything captured for one solved problem, as the page extractor emits it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub problem: Problem,
    pub url: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Time complexity.
    #[serde(default)]
    pub runtime: Option<String>,
    /// Space complexity.
    #[serde(default)]
    pub space: Option<String>,
    #[serde(default)]
    pub tips: Option<String>,
    #[serde(default)]
    pub approach: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub submission: Option<Submission>,
}

pub fn load(path: &Path) -> Result<ProblemRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid record JSON in {}", path.display()))
}

pub struct PageDraft {
    pub properties: Properties,
    pub children: Vec<Block>,
}

/// Properties plus body for a fresh page.
pub fn build_page(record: &ProblemRecord, solved_on: NaiveDate) -> PageDraft {
    PageDraft {
        properties: properties::build(record, solved_on),
        children: children::build(record),
    }
}

/// Non-empty, trimmed value of an optional text field.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
