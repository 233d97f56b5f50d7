use crate::convert::blocks::PLAIN_TEXT;

/// Map a LeetCode language id to the name Notion code blocks accept.
pub fn notion_language(lang: Option<&str>) -> &'static str {
    let Some(lang) = lang else {
        return PLAIN_TEXT;
    };
    match lang.trim().to_lowercase().as_str() {
        "python" | "python3" => "python",
        "javascript" => "javascript",
        "typescript" => "typescript",
        "java" => "java",
        "cpp" => "c++",
        "c" => "c",
        "csharp" => "c#",
        "go" => "go",
        "rust" => "rust",
        "ruby" => "ruby",
        "swift" => "swift",
        "kotlin" => "kotlin",
        "scala" => "scala",
        "php" => "php",
        "dart" => "dart",
        "sql" | "mysql" | "mssql" | "oraclesql" | "postgresql" => "sql",
        _ => PLAIN_TEXT,
    }
}
