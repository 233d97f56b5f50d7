use chrono::NaiveDate;

use super::{present, ProblemRecord};
use crate::notion::client::URL_PROPERTY;
use crate::notion::model::{DateValue, Properties, PropertyValue, RichText, SelectOption};

/// Database properties for a new page. `Name`, `Difficulty`, `Date Solved`
/// and the URL are always set; the rest only when the record has them.
pub fn build(record: &ProblemRecord, solved_on: NaiveDate) -> Properties {
    let problem = &record.problem;
    let mut props = Properties::new();

    props.insert(
        "Name".into(),
        PropertyValue::Title(vec![RichText::plain(problem.display_title())]),
    );
    props.insert("Difficulty".into(), PropertyValue::select(problem.difficulty.as_str()));
    props.insert(
        "Date Solved".into(),
        PropertyValue::Date(DateValue {
            start: solved_on.format("%Y-%m-%d").to_string(),
        }),
    );
    props.insert(URL_PROPERTY.into(), PropertyValue::Url(record.url.clone()));

    if !problem.topic_tags.is_empty() {
        let tags = problem
            .topic_tags
            .iter()
            .map(|t| SelectOption { name: t.name.clone() })
            .collect();
        props.insert("Tags".into(), PropertyValue::MultiSelect(tags));
    }
    if let Some(runtime) = present(&record.runtime) {
        props.insert("Runtime".into(), PropertyValue::text(runtime));
    }
    if let Some(space) = present(&record.space) {
        props.insert("Space".into(), PropertyValue::text(space));
    }
    if let Some(approach) = present(&record.approach) {
        props.insert("Approach".into(), PropertyValue::select(approach));
    }
    if let Some(platform) = present(&record.platform) {
        props.insert("Platform".into(), PropertyValue::select(platform));
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::two_sum;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn full_record() {
        let props = build(&two_sum(), day());
        let names: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "Approach",
                "Date Solved",
                "Difficulty",
                "LeetCode URL",
                "Name",
                "Platform",
                "Runtime",
                "Space",
                "Tags"
            ]
        );
        assert_eq!(
            serde_json::to_value(&props["Date Solved"]).unwrap(),
            json!({ "date": { "start": "2026-10-18" } })
        );
        assert_eq!(
            serde_json::to_value(&props["Tags"]).unwrap(),
            json!({ "multi_select": [{ "name": "Array" }, { "name": "Hash Table" }] })
        );
    }

    #[test]
    fn optional_fields_omitted() {
        let mut record = two_sum();
        record.problem.topic_tags.clear();
        record.runtime = None;
        record.space = Some("   ".into());
        record.approach = None;
        record.platform = None;

        let props = build(&record, day());
        let names: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Date Solved", "Difficulty", "LeetCode URL", "Name"]);
        assert_eq!(
            serde_json::to_value(&props["Name"]).unwrap(),
            json!({ "title": [{ "type": "text", "text": { "content": "1. Two Sum" } }] })
        );
    }
}
