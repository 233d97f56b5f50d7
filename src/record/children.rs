use chrono::NaiveDate;

use super::language::notion_language;
use super::related::similar_problems;
use super::{present, ProblemRecord, Submission};
use crate::convert::{self, ContentBlock};
use crate::notion::model::{Block, RichText};

const DESCRIPTION_HEADING: &str = "\u{1f4dd} Problem Description";
const SOLUTION_HEADING: &str = "\u{1f4bb} My Solution";
const COMPLEXITY_HEADING: &str = "\u{23f1}\u{fe0f} Complexity Analysis";
const TIPS_HEADING: &str = "\u{1f4a1} Tips & Common Mistakes";
const RELATED_HEADING: &str = "\u{1f517} Related Problems";

/// Body of a new page: description, solution, complexity, then the optional
/// tips and related-problems sections.
pub fn build(record: &ProblemRecord) -> Vec<Block> {
    let mut children = vec![Block::from(ContentBlock::heading(DESCRIPTION_HEADING))];

    if let Some(html) = record.problem.content.as_deref() {
        children.extend(convert::convert(html).iter().map(Block::from));
    }
    children.push(Block::divider());

    children.push(Block::from(ContentBlock::heading(SOLUTION_HEADING)));
    if let Some(code) = solution_code(record) {
        children.push(code);
    }
    if let Some(line) = record.submission.as_ref().and_then(stats_line) {
        children.push(Block::paragraph(vec![RichText::plain(line).italic_gray()]));
    }
    children.push(Block::divider());

    children.push(Block::from(ContentBlock::heading(COMPLEXITY_HEADING)));
    if let Some(runtime) = present(&record.runtime) {
        children.push(bullet(format!("Time Complexity: {}", runtime)));
    }
    if let Some(space) = present(&record.space) {
        children.push(bullet(format!("Space Complexity: {}", space)));
    }

    if let Some(tips) = present(&record.tips) {
        children.push(Block::divider());
        children.push(Block::from(ContentBlock::heading(TIPS_HEADING)));
        children.push(Block::from(ContentBlock::paragraph(tips)));
    }

    let related = record
        .problem
        .similar_questions
        .as_ref()
        .and_then(similar_problems)
        .unwrap_or_default();
    if !related.is_empty() {
        children.push(Block::divider());
        children.push(Block::from(ContentBlock::heading(RELATED_HEADING)));
        for q in &related {
            children.push(Block::bullet(vec![RichText::plain(q.label()).linked(q.url())]));
        }
    }

    children
}

/// Blocks appended to an existing page for an alternate solution.
pub fn solution_blocks(record: &ProblemRecord, number: u32, solved_on: NaiveDate) -> Vec<Block> {
    let mut children = vec![
        Block::divider(),
        Block::from(ContentBlock::heading(format!("\u{1f4bb} Solution {}", number))),
        Block::paragraph(vec![RichText::plain(format!(
            "{} | {}",
            present(&record.language).unwrap_or("unknown"),
            solved_on.format("%Y-%m-%d")
        ))
        .italic_gray()]),
    ];

    if let Some(code) = solution_code(record) {
        children.push(code);
    }
    if let Some(line) = record.submission.as_ref().and_then(stats_line) {
        children.push(Block::paragraph(vec![RichText::plain(line).italic_gray()]));
    }
    if let Some(runtime) = present(&record.runtime) {
        children.push(bullet(format!("Time: {}", runtime)));
    }
    if let Some(space) = present(&record.space) {
        children.push(bullet(format!("Space: {}", space)));
    }
    if let Some(approach) = present(&record.approach) {
        children.push(Block::paragraph(vec![
            RichText::plain(format!("Approach: {}", approach)).bold(),
        ]));
    }

    children
}

fn solution_code(record: &ProblemRecord) -> Option<Block> {
    let code = record.code.as_deref().filter(|c| !c.is_empty())?;
    let language = notion_language(record.language.as_deref());
    Some(Block::from(ContentBlock::code(code, language)))
}

fn bullet(text: String) -> Block {
    Block::from(ContentBlock::bullet(&text))
}

/// `Runtime: 3 ms (beats 98.7%) | Memory: 12.1 MB (beats 40.0%)`
pub fn stats_line(sub: &Submission) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(runtime) = sub.runtime_display.as_deref().filter(|s| !s.is_empty()) {
        parts.push(with_percentile(format!("Runtime: {}", runtime), sub.runtime_percentile));
    }
    if let Some(memory) = sub.memory_display.as_deref().filter(|s| !s.is_empty()) {
        parts.push(with_percentile(format!("Memory: {}", memory), sub.memory_percentile));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn with_percentile(text: String, percentile: Option<f64>) -> String {
    match percentile {
        Some(p) => format!("{} (beats {:.1}%)", text, p),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::model::BlockBody;
    use crate::record::tests::two_sum;
    use serde_json::{json, Value};

    fn kinds(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .map(|b| serde_json::to_value(b).unwrap()["type"].as_str().unwrap().to_string())
            .collect()
    }

    fn headings(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|b| match &b.body {
                BlockBody::Heading2 { heading_2 } => Some(heading_2.rich_text[0].text.content.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn full_page_sections() {
        let blocks = build(&two_sum());
        assert_eq!(
            headings(&blocks),
            vec![
                DESCRIPTION_HEADING,
                SOLUTION_HEADING,
                COMPLEXITY_HEADING,
                TIPS_HEADING,
                RELATED_HEADING
            ]
        );
        let v: Value = serde_json::to_value(blocks.last().unwrap()).unwrap();
        assert_eq!(
            v["bulleted_list_item"]["rich_text"][0]["text"],
            json!({ "content": "3Sum (Medium)", "link": { "url": "https://leetcode.com/problems/3sum/" } })
        );
    }

    #[test]
    fn solution_code_uses_mapped_language() {
        let blocks = build(&two_sum());
        let code = blocks
            .iter()
            .map(|b| serde_json::to_value(b).unwrap())
            .filter(|v| v["type"] == "code")
            .last()
            .unwrap();
        assert_eq!(code["code"]["language"], "python");
    }

    #[test]
    fn description_code_is_plain_text() {
        let blocks = build(&two_sum());
        let first_code = blocks
            .iter()
            .map(|b| serde_json::to_value(b).unwrap())
            .find(|v| v["type"] == "code")
            .unwrap();
        assert_eq!(first_code["code"]["language"], "plain text");
    }

    #[test]
    fn bad_related_json_skips_section() {
        let mut record = two_sum();
        record.problem.similar_questions = Some(json!("[{broken"));
        record.tips = None;
        let blocks = build(&record);
        assert!(!headings(&blocks).contains(&RELATED_HEADING.to_string()));
        assert!(!headings(&blocks).contains(&TIPS_HEADING.to_string()));
        assert_eq!(kinds(&blocks).last().map(String::as_str), Some("bulleted_list_item"));
    }

    #[test]
    fn bare_record() {
        let mut record = two_sum();
        record.problem.content = None;
        record.code = None;
        record.submission = None;
        record.runtime = None;
        record.space = None;
        record.tips = None;
        record.problem.similar_questions = None;
        assert_eq!(
            kinds(&build(&record)),
            vec!["heading_2", "divider", "heading_2", "divider", "heading_2"]
        );
    }

    #[test]
    fn appended_solution() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let blocks = solution_blocks(&two_sum(), 2, day);
        assert_eq!(
            kinds(&blocks),
            vec![
                "divider",
                "heading_2",
                "paragraph",
                "code",
                "paragraph",
                "bulleted_list_item",
                "bulleted_list_item",
                "paragraph"
            ]
        );
        assert_eq!(headings(&blocks), vec!["\u{1f4bb} Solution 2"]);

        let meta = serde_json::to_value(&blocks[2]).unwrap();
        assert_eq!(meta["paragraph"]["rich_text"][0]["text"]["content"], "python3 | 2026-10-18");
        let approach = serde_json::to_value(&blocks[7]).unwrap();
        assert_eq!(
            approach["paragraph"]["rich_text"][0]["text"]["content"],
            "Approach: Hash Map"
        );
    }

    #[test]
    fn stats_line_formats() {
        let sub = Submission {
            runtime_display: Some("3 ms".into()),
            runtime_percentile: Some(98.72),
            memory_display: Some("12.1 MB".into()),
            memory_percentile: None,
        };
        assert_eq!(stats_line(&sub).unwrap(), "Runtime: 3 ms (beats 98.7%) | Memory: 12.1 MB");
        assert!(stats_line(&Submission::default()).is_none());
    }
}
