use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::model::{Properties, SchemaProperty};

/// Properties a record may carry beyond the core four, with the schema type
/// each needs. These are the ones auto-provisioning is allowed to create.
pub const OPTIONAL_PROPERTIES: &[(&str, &str)] = &[
    ("Tags", "multi_select"),
    ("Runtime", "rich_text"),
    ("Space", "rich_text"),
    ("Approach", "select"),
    ("Platform", "select"),
];

#[derive(Debug, Default)]
pub struct Adapted {
    pub properties: Properties,
    pub dropped: Vec<String>,
    /// `(from, to)` when the title property had to be renamed.
    pub renamed_title: Option<(String, String)>,
}

/// Fit `properties` to a database's declared schema.
///
/// Properties missing from the schema, or declared with a different type, are
/// dropped. The title value is moved to whatever the database calls its title
/// property (every database has exactly one).
pub fn adapt(properties: &Properties, schema: &BTreeMap<String, SchemaProperty>) -> Adapted {
    let title_name = schema
        .iter()
        .find(|(_, p)| p.kind == "title")
        .map(|(name, _)| name.clone());

    let mut adapted = Adapted::default();
    for (name, value) in properties {
        if value.kind() == "title" {
            match &title_name {
                Some(target) => {
                    if target != name {
                        adapted.renamed_title = Some((name.clone(), target.clone()));
                    }
                    adapted.properties.insert(target.clone(), value.clone());
                }
                None => adapted.dropped.push(name.clone()),
            }
            continue;
        }

        match schema.get(name) {
            Some(declared) if declared.kind == value.kind() => {
                adapted.properties.insert(name.clone(), value.clone());
            }
            _ => adapted.dropped.push(name.clone()),
        }
    }
    adapted
}

/// Schema additions for optional properties the database lacks, shaped for
/// `PATCH /databases/{id}`. Names present with any type are left alone.
pub fn missing_optional(schema: &BTreeMap<String, SchemaProperty>) -> BTreeMap<String, Value> {
    OPTIONAL_PROPERTIES
        .iter()
        .filter(|(name, _)| !schema.contains_key(*name))
        .map(|(name, kind)| (name.to_string(), json!({ *kind: {} })))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::model::{PropertyValue, RichText};

    fn schema(entries: &[(&str, &str)]) -> BTreeMap<String, SchemaProperty> {
        entries
            .iter()
            .map(|(n, k)| (n.to_string(), SchemaProperty { kind: k.to_string() }))
            .collect()
    }

    fn record_props() -> Properties {
        let mut props = Properties::new();
        props.insert("Name".into(), PropertyValue::Title(vec![RichText::plain("1. Two Sum")]));
        props.insert("Difficulty".into(), PropertyValue::select("Easy"));
        props.insert("Approach".into(), PropertyValue::select("Hash Map"));
        props.insert("Runtime".into(), PropertyValue::text("O(n)"));
        props
    }

    #[test]
    fn keeps_matching_drops_unknown() {
        let s = schema(&[("Name", "title"), ("Difficulty", "select"), ("Runtime", "rich_text")]);
        let a = adapt(&record_props(), &s);
        assert_eq!(a.dropped, vec!["Approach"]);
        assert!(a.properties.contains_key("Runtime"));
        assert!(a.renamed_title.is_none());
    }

    #[test]
    fn type_mismatch_dropped() {
        let s = schema(&[("Name", "title"), ("Difficulty", "rich_text")]);
        let a = adapt(&record_props(), &s);
        assert!(a.dropped.contains(&"Difficulty".to_string()));
    }

    #[test]
    fn title_renamed() {
        let s = schema(&[("Problem", "title"), ("Difficulty", "select")]);
        let a = adapt(&record_props(), &s);
        assert_eq!(a.renamed_title, Some(("Name".into(), "Problem".into())));
        assert!(matches!(a.properties.get("Problem"), Some(PropertyValue::Title(_))));
        assert!(!a.properties.contains_key("Name"));
    }

    #[test]
    fn missing_optional_shapes() {
        let s = schema(&[("Name", "title"), ("Tags", "multi_select"), ("Space", "number")]);
        let missing = missing_optional(&s);
        let names: Vec<&str> = missing.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Approach", "Platform", "Runtime"]);
        assert_eq!(missing["Approach"], json!({ "select": {} }));
    }
}
