//! Content store access.
//!
//! Everything that talks to the hosted content database goes through the
//! [`ContentStore`] trait so services can be exercised against
//! [`MemoryStore`] without network access.

mod notion;
mod page;

pub use notion::{NotionClient, API_VERSION, DEFAULT_BASE_URL};
pub use page::{
    DatabaseQuery, DateValue, PageId, PageObject, PageRef, PageRequest, Parent, PlainContent,
    PlainText, PropertyValue, QueryResponse, SelectValue, MAX_CHILDREN_PER_REQUEST,
};

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::Result;

/// Operations the services need from the content store.
pub trait ContentStore: Send + Sync {
    /// Create a page inside a database.
    fn create_page(&self, request: &PageRequest) -> Result<PageRef>;

    /// Query a database, following pagination until exhausted.
    fn query_database(&self, database_id: &str, query: &DatabaseQuery) -> Result<Vec<PageObject>>;
}

impl<S: ContentStore + ?Sized> ContentStore for &S {
    fn create_page(&self, request: &PageRequest) -> Result<PageRef> {
        (**self).create_page(request)
    }

    fn query_database(&self, database_id: &str, query: &DatabaseQuery) -> Result<Vec<PageObject>> {
        (**self).query_database(database_id, query)
    }
}

/// In-memory store that records created pages and serves canned query results.
///
/// Used for dry runs and tests. Filters are not evaluated; a query returns
/// every page registered for the database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    created: Mutex<Vec<PageRequest>>,
    databases: Mutex<HashMap<String, Vec<PageObject>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register pages returned by queries against a database.
    pub fn with_pages(self, database_id: &str, pages: Vec<PageObject>) -> Self {
        self.databases
            .lock()
            .entry(database_id.to_string())
            .or_default()
            .extend(pages);
        self
    }

    /// Pages created so far, in creation order.
    pub fn created(&self) -> Vec<PageRequest> {
        self.created.lock().clone()
    }

    /// Number of pages created so far.
    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }
}

impl ContentStore for MemoryStore {
    fn create_page(&self, request: &PageRequest) -> Result<PageRef> {
        let mut created = self.created.lock();
        created.push(request.clone());
        Ok(PageRef {
            id: format!("memory-page-{}", created.len()),
            url: None,
        })
    }

    fn query_database(&self, database_id: &str, _query: &DatabaseQuery) -> Result<Vec<PageObject>> {
        Ok(self
            .databases
            .lock()
            .get(database_id)
            .cloned()
            .unwrap_or_default())
    }
}
