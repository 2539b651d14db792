//! Integration tests for review submission against a content store.

use parking_lot::Mutex;
use serde_json::json;

use richblocks::error::{Error, Result};
use richblocks::store::{DatabaseQuery, PageObject, PageRef, PageRequest, PropertyValue};
use richblocks::submit::{search_authors, submit_review, Destinations, ReviewType, Submission};
use richblocks::{ContentStore, HtmlParser};

/// Store that records requests and can be told to fail.
#[derive(Default)]
struct RecordingStore {
    requests: Mutex<Vec<PageRequest>>,
    queries: Mutex<Vec<(String, DatabaseQuery)>>,
    authors: Vec<PageObject>,
    fail_with: Option<u16>,
}

impl ContentStore for RecordingStore {
    fn create_page(&self, request: &PageRequest) -> Result<PageRef> {
        if let Some(status) = self.fail_with {
            return Err(Error::Store {
                status,
                message: "upstream unavailable".into(),
            });
        }
        let mut requests = self.requests.lock();
        requests.push(request.clone());
        Ok(PageRef {
            id: format!("page-{}", requests.len()),
            url: None,
        })
    }

    fn query_database(&self, database_id: &str, query: &DatabaseQuery) -> Result<Vec<PageObject>> {
        self.queries
            .lock()
            .push((database_id.to_string(), query.clone()));
        Ok(self.authors.clone())
    }
}

fn destinations() -> Destinations {
    Destinations::new()
        .with(ReviewType::BookReview, "db-books")
        .with(ReviewType::PictureBookReview, "db-picture")
        .with(ReviewType::Reflection, "db-reflect")
}

fn submission(html: &str) -> Submission {
    Submission {
        title: "Little Women".into(),
        author_id: "author-1".into(),
        html: Some(html.into()),
        ..Default::default()
    }
}

fn author(id: &str, name: Option<&str>) -> PageObject {
    let properties = match name {
        Some(name) => json!({ "Name": { "title": [{ "text": { "content": name } }] } }),
        None => json!({ "Name": { "title": [] } }),
    };
    serde_json::from_value(json!({ "id": id, "properties": properties })).unwrap()
}

#[test]
fn test_submission_creates_page_in_matching_database() {
    let store = RecordingStore::default();
    let parser = HtmlParser::new();

    let page = submit_review(
        &store,
        &destinations(),
        "pictureBookReview",
        &submission("<p>Lovely <b>pictures</b></p>"),
        &parser,
    )
    .unwrap();
    assert_eq!(page.id, "page-1");

    let requests = store.requests.lock();
    let request = &requests[0];
    assert_eq!(request.parent.database_id, "db-picture");
    assert_eq!(request.title_text("Name"), Some("Little Women"));
    assert!(matches!(
        request.properties.get("Author"),
        Some(PropertyValue::Relation(ids)) if ids[0].id == "author-1"
    ));
    assert_eq!(request.children.len(), 1);
    assert_eq!(
        request.icon.as_ref().map(|i| i.url().to_string()),
        Some(ReviewType::PictureBookReview.default_icon().url().to_string())
    );
    assert!(request.cover.is_some());
}

#[test]
fn test_preconverted_blocks_win_over_html() {
    let store = RecordingStore::default();
    let parser = HtmlParser::new();
    let blocks = richblocks::Richblocks::new()
        .parse("<ul><li>a</li><li>b</li></ul>")
        .to_wire();

    let mut review = submission("<p>ignored</p>");
    review.formatted_blocks = Some(blocks);
    submit_review(&store, &destinations(), "reflection", &review, &parser).unwrap();

    let requests = store.requests.lock();
    assert_eq!(requests[0].children.len(), 2);
    assert_eq!(requests[0].children[0].type_name(), "bulleted_list_item");
}

#[test]
fn test_client_errors() {
    let store = RecordingStore::default();
    let parser = HtmlParser::new();

    let err = submit_review(&store, &destinations(), "poem", &submission("<p>x</p>"), &parser)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReviewType(_)));
    assert!(err.is_client_error());

    let err = submit_review(&store, &destinations(), "bookReview", &submission("<p> </p>"), &parser)
        .unwrap_err();
    assert!(matches!(err, Error::EmptySubmission));

    let mut untitled = submission("<p>x</p>");
    untitled.title = "   ".into();
    let err = submit_review(&store, &destinations(), "bookReview", &untitled, &parser).unwrap_err();
    assert!(matches!(err, Error::MissingField("title")));

    assert!(store.requests.lock().is_empty());
}

#[test]
fn test_unconfigured_destination_is_rejected() {
    let store = RecordingStore::default();
    let only_books = Destinations::new().with(ReviewType::BookReview, "db-books");

    let err = submit_review(
        &store,
        &only_books,
        "reflection",
        &submission("<p>x</p>"),
        &HtmlParser::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidReviewType(name) if name == "reflection"));
}

#[test]
fn test_store_failure_is_not_a_client_error() {
    let store = RecordingStore {
        fail_with: Some(502),
        ..Default::default()
    };
    let err = submit_review(
        &store,
        &destinations(),
        "bookReview",
        &submission("<p>x</p>"),
        &HtmlParser::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Store { status: 502, .. }));
    assert!(!err.is_client_error());
}

#[test]
fn test_author_search() {
    let store = RecordingStore {
        authors: vec![
            author("a1", Some("Jo March")),
            author("a2", Some("Meg March")),
            author("a3", None),
        ],
        ..Default::default()
    };

    let all = search_authors(&store, "db-authors", None).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].name, "Unknown");

    let jo = search_authors(&store, "db-authors", Some("JO")).unwrap();
    assert_eq!(jo.len(), 1);
    assert_eq!(jo[0].id, "a1");

    let blank = search_authors(&store, "db-authors", Some("  ")).unwrap();
    assert_eq!(blank.len(), 3);

    let queries = store.queries.lock();
    assert_eq!(queries.len(), 3);
    assert!(queries.iter().all(|(db, q)| db == "db-authors" && q.filter.is_none()));
}
