use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarProblem {
    pub title: String,
    pub title_slug: String,
    pub difficulty: String,
}

impl SimilarProblem {
    pub fn url(&self) -> String {
        format!("https://leetcode.com/problems/{}/", self.title_slug)
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.difficulty)
    }
}

/// Decode the similar-problems field, which arrives either as a JSON string or
/// already parsed. Anything undecodable yields `None`; the section is optional.
pub fn similar_problems(raw: &Value) -> Option<Vec<SimilarProblem>> {
    let decoded = match raw {
        Value::String(s) => serde_json::from_str::<Vec<SimilarProblem>>(s),
        other => serde_json::from_value::<Vec<SimilarProblem>>(other.clone()),
    };
    match decoded {
        Ok(list) => Some(list),
        Err(e) => {
            debug!("Skipping related problems: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_string_form() {
        let raw = json!(r#"[{"title":"3Sum","titleSlug":"3sum","difficulty":"Medium"}]"#);
        let list = similar_problems(&raw).unwrap();
        assert_eq!(list[0].label(), "3Sum (Medium)");
        assert_eq!(list[0].url(), "https://leetcode.com/problems/3sum/");
    }

    #[test]
    fn decodes_array_form() {
        let raw = json!([{ "title": "4Sum", "titleSlug": "4sum", "difficulty": "Medium", "translatedTitle": null }]);
        assert_eq!(similar_problems(&raw).unwrap().len(), 1);
    }

    #[test]
    fn malformed_is_none() {
        assert!(similar_problems(&json!("[{not json")).is_none());
        assert!(similar_problems(&json!({ "title": "x" })).is_none());
        assert!(similar_problems(&json!([{ "title": "missing slug" }])).is_none());
    }
}
