//! Published posts of a database.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{ContentStore, DatabaseQuery};

/// A published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Page id
    pub id: String,
    /// Post title
    pub content: String,
}

/// List pages whose `Status` is `Publish`.
pub fn published_posts<S: ContentStore + ?Sized>(store: &S, database_id: &str) -> Result<Vec<Post>> {
    let query = DatabaseQuery::status_equals("Status", "Publish");
    let posts: Vec<Post> = store
        .query_database(database_id, &query)?
        .into_iter()
        .map(|page| Post {
            content: page
                .title_text("Name")
                .unwrap_or_else(|| "No title".to_string()),
            id: page.id,
        })
        .collect();

    log::debug!("{} published posts in {}", posts.len(), database_id);
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, PageObject};
    use serde_json::json;

    #[test]
    fn test_published_posts() {
        let pages: Vec<PageObject> = serde_json::from_value(json!([
            { "id": "a", "properties": { "Name": { "title": [ { "text": { "content": "Hello" } } ] } } },
            { "id": "b", "properties": {} }
        ]))
        .unwrap();
        let store = MemoryStore::new().with_pages("blog", pages);

        let posts = published_posts(&store, "blog").unwrap();
        assert_eq!(
            posts,
            vec![
                Post { id: "a".into(), content: "Hello".into() },
                Post { id: "b".into(), content: "No title".into() },
            ]
        );
    }
}
