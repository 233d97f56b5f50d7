use std::collections::BTreeMap;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::error::NotionError;
use super::model::{
    ApiErrorBody, Block, BlockList, DatabaseObject, PageObject, Properties, QueryResponse,
    SearchResponse,
};
use super::schema;

pub const API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";
/// Property holding the problem URL; duplicate detection filters on it.
pub const URL_PROPERTY: &str = "LeetCode URL";

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;
const MAX_BACKOFF: Duration = Duration::from_secs(60);
/// The API accepts at most this many children per create/append request.
const MAX_CHILDREN_PER_REQUEST: usize = 100;
const PAGE_SIZE: u32 = 100;

pub type Result<T> = std::result::Result<T, NotionError>;

pub struct DatabaseSummary {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

pub struct NotionClient {
    http: reqwest::Client,
    base: String,
    token: String,
    max_retries: u32,
    backoff: Duration,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        NotionClient {
            http: reqwest::Client::new(),
            base: API_BASE.to_string(),
            token: token.into(),
            max_retries: MAX_RETRIES,
            backoff: Duration::from_millis(BASE_BACKOFF_MS),
        }
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff = backoff;
        self
    }

    /// Create a page in `database_id`.
    ///
    /// If the API rejects a property, the database schema is fetched, the
    /// properties are fitted to it, and the write is retried once. Children
    /// beyond the per-request limit are appended afterwards.
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
        children: &[Block],
    ) -> Result<PageObject> {
        let (first, rest) = children.split_at(children.len().min(MAX_CHILDREN_PER_REQUEST));

        let page = match self.post_page(database_id, properties, first).await {
            Err(e) if e.is_property_error() => {
                warn!("Property validation error, adapting to database schema: {}", e);
                let db = self.retrieve_database(database_id).await?;
                let adapted = schema::adapt(properties, &db.properties);
                if let Some((from, to)) = &adapted.renamed_title {
                    info!("Title property '{}' written as '{}'", from, to);
                }
                if !adapted.dropped.is_empty() {
                    warn!("Dropping properties not in database: {}", adapted.dropped.join(", "));
                }
                self.post_page(database_id, &adapted.properties, first).await?
            }
            other => other?,
        };

        if !rest.is_empty() {
            self.append_children(&page.id, rest).await?;
        }
        Ok(page)
    }

    async fn post_page(
        &self,
        database_id: &str,
        properties: &Properties,
        children: &[Block],
    ) -> Result<PageObject> {
        let body = json!({
            "parent": { "database_id": database_id },
            "icon": { "type": "emoji", "emoji": "\u{2705}" },
            "properties": properties,
            "children": children,
        });
        self.request(Method::POST, "/pages", Some(&body)).await
    }

    /// Databases shared with the integration, most recently edited first.
    pub async fn search_databases(&self) -> Result<Vec<DatabaseSummary>> {
        let body = json!({
            "filter": { "property": "object", "value": "database" },
            "sort": { "direction": "descending", "timestamp": "last_edited_time" },
        });
        let resp: SearchResponse = self.request(Method::POST, "/search", Some(&body)).await?;
        Ok(resp
            .results
            .into_iter()
            .map(|db| DatabaseSummary {
                title: db.display_title().to_string(),
                id: db.id,
                url: db.url,
            })
            .collect())
    }

    /// The page whose URL property equals `problem_url`, if any.
    pub async fn find_page_by_url(
        &self,
        database_id: &str,
        problem_url: &str,
    ) -> Result<Option<PageObject>> {
        let body = json!({
            "filter": { "property": URL_PROPERTY, "url": { "equals": problem_url } },
            "page_size": 1,
        });
        let path = format!("/databases/{}/query", database_id);
        let resp: QueryResponse = self.request(Method::POST, &path, Some(&body)).await?;
        Ok(resp.results.into_iter().next())
    }

    /// Number the next solution on `page_id` would get: existing solution
    /// headings plus one. Falls back to 1 when the page can't be read.
    pub async fn count_solutions(&self, page_id: &str) -> u32 {
        let path = format!("/blocks/{}/children?page_size={}", page_id, PAGE_SIZE);
        let list: BlockList = match self.request(Method::GET, &path, None).await {
            Ok(list) => list,
            Err(e) => {
                debug!("Could not list blocks of {}: {}", page_id, e);
                return 1;
            }
        };

        let existing = list
            .results
            .iter()
            .filter(|b| b.kind == "heading_2")
            .filter_map(|b| b.heading_2.as_ref()?.rich_text.first())
            .filter(|t| t.plain_text.contains("Solution"))
            .count() as u32;
        existing + 1
    }

    pub async fn append_children(&self, page_id: &str, children: &[Block]) -> Result<()> {
        let path = format!("/blocks/{}/children", page_id);
        for batch in children.chunks(MAX_CHILDREN_PER_REQUEST) {
            let body = json!({ "children": batch });
            let _: Value = self.request(Method::PATCH, &path, Some(&body)).await?;
        }
        Ok(())
    }

    /// Every page in the database, following `next_cursor` until exhausted.
    pub async fn query_all_pages(&self, database_id: &str) -> Result<Vec<PageObject>> {
        let path = format!("/databases/{}/query", database_id);
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(c) = &cursor {
                body["start_cursor"] = json!(c);
            }
            let resp: QueryResponse = self.request(Method::POST, &path, Some(&body)).await?;
            pages.extend(resp.results);
            pb.set_message(format!("{} pages", pages.len()));
            pb.tick();

            cursor = match (resp.has_more, resp.next_cursor) {
                (true, Some(next)) => Some(next),
                _ => break,
            };
        }

        pb.finish_and_clear();
        info!("Fetched {} pages from {}", pages.len(), database_id);
        Ok(pages)
    }

    pub async fn retrieve_database(&self, database_id: &str) -> Result<DatabaseObject> {
        let path = format!("/databases/{}", database_id);
        self.request(Method::GET, &path, None).await
    }

    /// Add property definitions (`{"Name": {"select": {}}, ...}`) to a database.
    pub async fn add_properties(
        &self,
        database_id: &str,
        properties: &BTreeMap<String, Value>,
    ) -> Result<DatabaseObject> {
        let path = format!("/databases/{}", database_id);
        let body = json!({ "properties": properties });
        self.request(Method::PATCH, &path, Some(&body)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let mut attempt = 0;
        loop {
            match self.send(method.clone(), path, body).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let backoff = backoff_delay(self.backoff, attempt);
                    warn!(
                        "{} {} failed ({}), attempt {}/{}, backing off {:.1}s",
                        method,
                        path,
                        e,
                        attempt + 1,
                        self.max_retries,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        let mut req = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let err: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(NotionError::api(status.as_u16(), err));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// `base * 2^attempt`, capped at `MAX_BACKOFF`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor).unwrap_or(MAX_BACKOFF).min(MAX_BACKOFF)
}
