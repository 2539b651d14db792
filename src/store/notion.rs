//! Blocking HTTP client for the hosted content store.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};

use super::{ContentStore, DatabaseQuery, PageObject, PageRef, PageRequest, QueryResponse};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version header value the payloads are written against.
pub const API_VERSION: &str = "2022-06-28";

/// Content store client over the public REST API.
pub struct NotionClient {
    http: Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    /// Create a client authenticated with an integration token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(token, Duration::from_secs(30))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("richblocks/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
        })
    }

    /// Point the client at another API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full URL of an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        self.send(Method::POST, path, body)
    }

    fn patch<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        self.send(Method::PATCH, path, body)
    }

    fn send<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let url = self.endpoint(path);
        log::debug!("{} {}", method, url);

        let response = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Notion-Version", API_VERSION)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Store {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response.json()?)
    }
}

impl fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ContentStore for NotionClient {
    fn create_page(&self, request: &PageRequest) -> Result<PageRef> {
        let (first, rest) = request.split_children();
        let page: PageRef = self.post("pages", &first)?;
        if rest.is_empty() {
            return Ok(page);
        }

        log::debug!(
            "page {} has {} blocks, appending the rest in {} requests",
            page.id,
            request.children.len(),
            rest.len()
        );
        let path = format!("blocks/{}/children", page.id);
        for chunk in rest {
            let _: Value = self.patch(&path, &json!({ "children": chunk }))?;
        }
        Ok(page)
    }

    fn query_database(&self, database_id: &str, query: &DatabaseQuery) -> Result<Vec<PageObject>> {
        let path = format!("databases/{}/query", database_id);
        let mut pages = Vec::new();
        let mut next = query.clone();

        loop {
            let response: QueryResponse = self.post(&path, &next)?;
            pages.extend(response.results);
            match response.next_cursor {
                Some(cursor) if response.has_more => next = query.after(cursor),
                _ => break,
            }
        }

        log::debug!("database {} returned {} pages", database_id, pages.len());
        Ok(pages)
    }
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Extract the store's error message from a response body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        let client = NotionClient::new("secret")
            .unwrap()
            .with_base_url("http://localhost:9000/v1/");
        assert_eq!(client.endpoint("pages"), "http://localhost:9000/v1/pages");
        assert_eq!(
            client.endpoint("/databases/x/query"),
            "http://localhost:9000/v1/databases/x/query"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = NotionClient::new("secret_abc").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret_abc"));
        assert!(debug.contains(DEFAULT_BASE_URL));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"object":"error","status":400,"code":"validation_error","message":"body.children should be defined"}"#;
        assert_eq!(error_message(body), "body.children should be defined");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(""), "empty response");
    }
}
