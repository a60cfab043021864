//! Firestore REST adapter
//!
//! Pages are fetched with `documents:runQuery`, ordered by `createdAt` then
//! document name (both descending) so ties keep a stable order. A cursor is
//! the `(createdAt, name)` pair of the last document, replayed through
//! `startAt { before: false }`, which positions the next query strictly after
//! that document.

use super::types::{check_page_size, PageResult, PostStore};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, RequestConfig};
use crate::media::MediaResolver;
use crate::post::{DisplayPost, Post};
use crate::types::MediaVariant;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default Firestore REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";

const CREATED_AT_FIELD: &str = "createdAt";
const CONTENT_FIELD: &str = "content";
const IMAGE_FIELD: &str = "imageUrl";
const VIDEO_FIELD: &str = "videoUrl";

/// Connection settings for a Firestore database
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// REST endpoint, overridable for emulators and tests
    pub base_url: String,
    /// Google Cloud project id
    pub project_id: String,
    /// Database id
    pub database: String,
    /// Collection holding posts
    pub collection: String,
    /// Web API key sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Transport timeout
    pub timeout: Duration,
    /// Optional client-side rate limit
    pub rate_limit: Option<RateLimiterConfig>,
}

impl FirestoreConfig {
    /// Config for a project with default database and `posts` collection
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: project_id.into(),
            database: "(default)".to_string(),
            collection: "posts".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            rate_limit: None,
        }
    }

    /// Override the endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the collection
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Resource path of the documents root, as used in document names
    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }
}

/// Position after a Firestore document
#[derive(Debug, Clone)]
pub struct FirestoreCursor {
    created_at: String,
    name: String,
}

/// Firestore-backed post store
#[derive(Debug)]
pub struct FirestoreStore {
    client: HttpClient,
    config: FirestoreConfig,
    resolver: Arc<dyn MediaResolver>,
}

impl FirestoreStore {
    /// Create a store from config
    pub fn new(config: FirestoreConfig, resolver: Arc<dyn MediaResolver>) -> Result<Self> {
        let mut http = HttpClientConfig::builder().timeout(config.timeout);
        if let Some(ref limit) = config.rate_limit {
            http = http.rate_limit(limit.clone());
        }
        let client = HttpClient::with_config(http.build())?;

        Ok(Self {
            client,
            config,
            resolver,
        })
    }

    /// Store configuration
    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// Build an endpoint URL below `v1/`
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::invalid_value("store.base_url", "URL cannot be a base"))?
            .pop_if_empty()
            .push("v1")
            .push("projects")
            .push(&self.config.project_id)
            .push("databases")
            .push(&self.config.database)
            .extend(segments);
        Ok(url)
    }

    fn request(&self) -> RequestConfig {
        match self.config.api_key {
            Some(ref key) => RequestConfig::new().query("key", key.clone()),
            None => RequestConfig::new(),
        }
    }

    /// Structured query over the posts collection
    fn structured_query(&self, limit: Option<u32>, after: Option<&FirestoreCursor>) -> Value {
        let mut query = json!({
            "from": [{ "collectionId": self.config.collection }],
            "orderBy": [
                { "field": { "fieldPath": CREATED_AT_FIELD }, "direction": "DESCENDING" },
                { "field": { "fieldPath": "__name__" }, "direction": "DESCENDING" }
            ]
        });

        if let Some(limit) = limit {
            query["limit"] = json!(limit);
        }

        if let Some(cursor) = after {
            query["startAt"] = json!({
                "values": [
                    { "timestampValue": cursor.created_at },
                    { "referenceValue": cursor.name }
                ],
                "before": false
            });
        }

        json!({ "structuredQuery": query })
    }

    async fn run_query(
        &self,
        limit: Option<u32>,
        after: Option<&FirestoreCursor>,
    ) -> Result<Vec<(Post, FirestoreCursor)>> {
        let url = self.url(&["documents:runQuery"])?;
        let body = self.structured_query(limit, after);

        let rows: Vec<RunQueryRow> = self
            .client
            .post_json_with_config(url.as_str(), self.request().json(body))
            .await?;

        rows.into_iter()
            .filter_map(|row| row.document)
            .map(|doc| doc.into_post())
            .collect()
    }

    async fn fetch_page_inner(
        &self,
        page_size: u32,
        after: Option<&FirestoreCursor>,
    ) -> Result<PageResult<FirestoreCursor>> {
        check_page_size(page_size)?;
        if let Some(cursor) = after {
            if !cursor.name.starts_with(&self.config.documents_root()) {
                return Err(Error::invalid_cursor(format!(
                    "cursor '{}' does not belong to this database",
                    cursor.name
                )));
            }
        }

        let mut records = self.run_query(Some(page_size), after).await?;
        if records.len() > page_size as usize {
            warn!(
                "Store returned {} records for limit {}, truncating",
                records.len(),
                page_size
            );
            records.truncate(page_size as usize);
        }

        let cursor = records.last().map(|(_, c)| c.clone());
        let now = Utc::now();
        let posts = records
            .into_iter()
            .map(|(post, _)| {
                DisplayPost::from_post(post, self.resolver.as_ref(), MediaVariant::Feed, now)
            })
            .collect();

        Ok(PageResult::from_records(posts, cursor, page_size))
    }

    async fn fetch_single_inner(&self, id: &str) -> Result<Option<DisplayPost>> {
        if id.is_empty() || id.contains('/') {
            return Ok(None);
        }

        let url = self.url(&["documents", self.config.collection.as_str(), id])?;
        let document: Document = match self
            .client
            .get_json_with_config(url.as_str(), self.request())
            .await
        {
            Ok(doc) => doc,
            Err(Error::HttpStatus { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let (post, _) = document.into_post()?;
        Ok(Some(DisplayPost::from_post(
            post,
            self.resolver.as_ref(),
            MediaVariant::Detail,
            Utc::now(),
        )))
    }
}

#[async_trait]
impl PostStore for FirestoreStore {
    type Cursor = FirestoreCursor;

    async fn fetch_page(
        &self,
        page_size: u32,
        after: Option<&FirestoreCursor>,
    ) -> Result<PageResult<FirestoreCursor>> {
        debug!(
            "Firestore page query: collection={} limit={} after={}",
            self.config.collection,
            page_size,
            after.is_some()
        );
        let page = self
            .fetch_page_inner(page_size, after)
            .await
            .map_err(Error::into_fetch_failure)?;
        debug!(
            "Fetched {} posts (has_more={})",
            page.posts.len(),
            page.has_more
        );
        Ok(page)
    }

    async fn fetch_single(&self, id: &str) -> Result<Option<DisplayPost>> {
        self.fetch_single_inner(id)
            .await
            .map_err(Error::into_fetch_failure)
    }

    async fn fetch_all(&self) -> Result<Vec<DisplayPost>> {
        let records = self
            .run_query(None, None)
            .await
            .map_err(Error::into_fetch_failure)?;
        let now = Utc::now();
        Ok(records
            .into_iter()
            .map(|(post, _)| {
                DisplayPost::from_post(post, self.resolver.as_ref(), MediaVariant::Feed, now)
            })
            .collect())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    #[serde(default)]
    string_value: Option<String>,
    #[serde(default)]
    timestamp_value: Option<String>,
}

impl Document {
    fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    fn string_field(&self, field: &str) -> Option<String> {
        self.fields.get(field)?.string_value.clone()
    }

    fn into_post(self) -> Result<(Post, FirestoreCursor)> {
        let content = self.string_field(CONTENT_FIELD).ok_or_else(|| {
            Error::decode(format!("document '{}' has no {CONTENT_FIELD}", self.name))
        })?;

        let raw_created = self
            .fields
            .get(CREATED_AT_FIELD)
            .and_then(|v| v.timestamp_value.clone())
            .ok_or_else(|| {
                Error::decode(format!("document '{}' has no {CREATED_AT_FIELD}", self.name))
            })?;
        let created_at = DateTime::parse_from_rfc3339(&raw_created)
            .map_err(|e| {
                Error::decode(format!(
                    "document '{}' has invalid {CREATED_AT_FIELD}: {e}",
                    self.name
                ))
            })?
            .with_timezone(&Utc);

        let post = Post {
            id: self.id().to_string(),
            content,
            image_ref: self.string_field(IMAGE_FIELD),
            video_ref: self.string_field(VIDEO_FIELD),
            created_at,
        };
        let cursor = FirestoreCursor {
            created_at: raw_created,
            name: self.name,
        };
        Ok((post, cursor))
    }
}
