//! Request handlers.
//!
//! Handlers work on an [`Incoming`] snapshot of the request and return a
//! [`Reply`], so the whole route table can be exercised without sockets.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tiny_http::Method;

use richblocks::render::to_wire;
use richblocks::store::ContentStore;
use richblocks::submit::{search_authors, submit_review, Destinations, Submission};
use richblocks::HtmlParser;

use super::response::Reply;
use super::routes::{param, split_url, Route};
use super::session::{clear_cookie, cookie_value, SessionStore, COOKIE_NAME};

const LOGIN_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Login</title></head>
<body>
<form method="post" action="/login">
<input type="password" name="password" placeholder="Password" autofocus>
<button type="submit">Log in</button>
</form>
</body>
</html>
"#;

/// Shared server state.
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub destinations: Destinations,
    pub authors_db: Option<String>,
    pub parser: HtmlParser,
    pub sessions: SessionStore,
    pub admin_password: Option<String>,
    pub public_dir: PathBuf,
}

/// The parts of a request the handlers look at.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub method: Method,
    pub url: String,
    pub cookie: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Incoming {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            cookie: None,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn with_body(mut self, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.content_type = Some(content_type.to_string());
        self.body = body.into();
        self
    }

    fn session_id(&self) -> Option<&str> {
        self.cookie
            .as_deref()
            .and_then(|header| cookie_value(header, COOKIE_NAME))
    }

    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
    }
}

/// Dispatch a request.
pub fn handle(state: &AppState, request: &Incoming) -> Reply {
    let (path, query) = split_url(&request.url);
    let route = Route::resolve(&request.method, path);
    log::debug!("{} {} -> {:?}", request.method, path, route);

    match route {
        Route::Root => Reply::redirect("/public/pwa.html"),
        Route::Public(file) => public_file(state, &file),
        Route::Pwa => pwa(state, request),
        Route::LoginPage => login_page(state),
        Route::Login => login(state, request),
        Route::Logout => logout(state, request),
        Route::SessionStatus => Reply::json(
            200,
            &json!({ "isAuthenticated": is_authenticated(state, request) }),
        ),
        Route::Authors => authors(state, query),
        Route::Submit(kind) => submit(state, &kind, request),
        Route::Convert => convert(state, request),
        Route::Preflight => Reply::preflight(),
        Route::MethodNotAllowed => Reply::method_not_allowed(),
        Route::NotFound => Reply::not_found(),
    }
}

fn is_authenticated(state: &AppState, request: &Incoming) -> bool {
    request
        .session_id()
        .is_some_and(|id| state.sessions.is_valid(id))
}

fn public_file(state: &AppState, file: &str) -> Reply {
    match super::response::resolve_static(&state.public_dir, file) {
        Some(path) => Reply::file(&path).unwrap_or_else(|err| {
            log::warn!("failed to read {}: {}", path.display(), err);
            Reply::not_found()
        }),
        None => Reply::not_found(),
    }
}

fn pwa(state: &AppState, request: &Incoming) -> Reply {
    if !is_authenticated(state, request) {
        return Reply::redirect("/login");
    }
    public_file(state, "pwa.html")
}

fn login_page(state: &AppState) -> Reply {
    match super::response::resolve_static(&state.public_dir, "login.html") {
        Some(_) => public_file(state, "login.html"),
        None => Reply::html(200, LOGIN_FORM),
    }
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    password: String,
}

fn login(state: &AppState, request: &Incoming) -> Reply {
    let password = if request.is_json() {
        serde_json::from_slice::<LoginBody>(&request.body)
            .map(|b| b.password)
            .unwrap_or_default()
    } else {
        param(&String::from_utf8_lossy(&request.body), "password").unwrap_or_default()
    };

    let accepted = match state.admin_password.as_deref() {
        Some(expected) if !expected.is_empty() => password == expected,
        _ => {
            log::warn!("login attempted but no admin password is configured");
            false
        }
    };
    if !accepted {
        return Reply::error(401, "Invalid password");
    }

    let id = state.sessions.create();
    log::info!("new admin session ({} active)", state.sessions.len());
    Reply::redirect("/pwa").with_header("Set-Cookie", state.sessions.cookie(&id))
}

fn logout(state: &AppState, request: &Incoming) -> Reply {
    if let Some(id) = request.session_id() {
        state.sessions.remove(id);
    }
    Reply::redirect("/login").with_header("Set-Cookie", clear_cookie())
}

fn authors(state: &AppState, query: &str) -> Reply {
    let Some(db) = state.authors_db.as_deref() else {
        log::error!("author search requested but no authors database is configured");
        return Reply::error(500, "Failed to fetch authors");
    };
    let search = param(query, "search");
    match search_authors(state.store.as_ref(), db, search.as_deref()) {
        Ok(authors) => Reply::json(200, &authors),
        Err(err) => {
            log::error!("author search failed: {}", err);
            Reply::error(500, "Failed to fetch authors")
        }
    }
}

fn submit(state: &AppState, kind: &str, request: &Incoming) -> Reply {
    let submission: Submission = match serde_json::from_slice(&request.body) {
        Ok(submission) => submission,
        Err(err) => return Reply::error(400, &format!("Invalid request body: {}", err)),
    };

    match submit_review(
        state.store.as_ref(),
        &state.destinations,
        kind,
        &submission,
        &state.parser,
    ) {
        Ok(_) => Reply::json(
            200,
            &json!({ "success": true, "message": "Review submitted successfully" }),
        ),
        Err(err) if err.is_client_error() => Reply::error(400, &err.to_string()),
        Err(err) => {
            log::error!("submission to {} failed: {}", kind, err);
            Reply::error(500, "Failed to submit review")
        }
    }
}

fn convert(state: &AppState, request: &Incoming) -> Reply {
    let html = String::from_utf8_lossy(&request.body);
    let blocks = state.parser.parse(&html);
    Reply::json(200, &to_wire(&blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use richblocks::store::{MemoryStore, PageObject};
    use richblocks::submit::ReviewType;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: Arc<MemoryStore>,
        state: AppState,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pwa.html"), "<h1>app</h1>").unwrap();

        let author: PageObject = serde_json::from_value(json!({
            "id": "a1",
            "properties": { "Name": { "title": [ { "text": { "content": "Marmee" } } ] } }
        }))
        .unwrap();
        let store = Arc::new(MemoryStore::new().with_pages("authors", vec![author]));

        let state = AppState {
            store: store.clone(),
            destinations: Destinations::new().with(ReviewType::BookReview, "books"),
            authors_db: Some("authors".into()),
            parser: HtmlParser::new(),
            sessions: SessionStore::default(),
            admin_password: Some("hunter2".into()),
            public_dir: dir.path().to_path_buf(),
        };
        Fixture {
            _dir: dir,
            store,
            state,
        }
    }

    fn body_json(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    fn login(state: &AppState) -> String {
        let reply = handle(
            state,
            &Incoming::new(Method::Post, "/login")
                .with_body("application/x-www-form-urlencoded", "password=hunter2"),
        );
        assert_eq!(reply.status, 302);
        assert_eq!(reply.header("Location"), Some("/pwa"));
        let cookie = reply.header("Set-Cookie").unwrap().to_string();
        assert!(cookie.contains("HttpOnly"));
        cookie.split(';').next().unwrap().to_string()
    }

    #[test]
    fn test_root_redirects() {
        let fx = fixture();
        let reply = handle(&fx.state, &Incoming::new(Method::Get, "/"));
        assert_eq!(reply.header("Location"), Some("/public/pwa.html"));
    }

    #[test]
    fn test_session_gate() {
        let fx = fixture();
        let anonymous = handle(&fx.state, &Incoming::new(Method::Get, "/pwa"));
        assert_eq!(anonymous.header("Location"), Some("/login"));

        let status = handle(&fx.state, &Incoming::new(Method::Get, "/api/session-status"));
        assert_eq!(body_json(&status), json!({ "isAuthenticated": false }));

        let cookie = login(&fx.state);
        let page = handle(&fx.state, &Incoming::new(Method::Get, "/pwa").with_cookie(&cookie));
        assert_eq!(page.status, 200);
        assert_eq!(page.body, b"<h1>app</h1>");

        let status = handle(
            &fx.state,
            &Incoming::new(Method::Get, "/api/session-status").with_cookie(&cookie),
        );
        assert_eq!(body_json(&status), json!({ "isAuthenticated": true }));

        handle(&fx.state, &Incoming::new(Method::Post, "/logout").with_cookie(&cookie));
        let after = handle(&fx.state, &Incoming::new(Method::Get, "/pwa").with_cookie(&cookie));
        assert_eq!(after.status, 302);
    }

    #[test]
    fn test_wrong_password() {
        let fx = fixture();
        let reply = handle(
            &fx.state,
            &Incoming::new(Method::Post, "/login").with_body("application/json", r#"{"password":"nope"}"#),
        );
        assert_eq!(reply.status, 401);
        assert!(reply.header("Set-Cookie").is_none());
    }

    #[test]
    fn test_login_page_fallback() {
        let fx = fixture();
        let reply = handle(&fx.state, &Incoming::new(Method::Get, "/login"));
        assert_eq!(reply.status, 200);
        assert!(String::from_utf8_lossy(&reply.body).contains("name=\"password\""));
    }

    #[test]
    fn test_authors() {
        let fx = fixture();
        let reply = handle(&fx.state, &Incoming::new(Method::Get, "/authors?search=marm"));
        assert_eq!(body_json(&reply), json!([{ "id": "a1", "name": "Marmee" }]));

        let none = handle(&fx.state, &Incoming::new(Method::Get, "/authors?search=zzz"));
        assert_eq!(body_json(&none), json!([]));
    }

    #[test]
    fn test_submit() {
        let fx = fixture();
        let payload = json!({
            "title": "Little Women",
            "authorId": "a1",
            "html": "<p>A <b>warm</b> story</p>"
        })
        .to_string();

        let ok = handle(
            &fx.state,
            &Incoming::new(Method::Post, "/submit/bookReview").with_body("application/json", payload.clone()),
        );
        assert_eq!(ok.status, 200);
        assert_eq!(
            body_json(&ok),
            json!({ "success": true, "message": "Review submitted successfully" })
        );
        assert_eq!(fx.store.created_count(), 1);

        let invalid = handle(
            &fx.state,
            &Incoming::new(Method::Post, "/submit/poem").with_body("application/json", payload),
        );
        assert_eq!(invalid.status, 400);
        assert_eq!(body_json(&invalid), json!({ "error": "Invalid review type" }));

        let empty = handle(
            &fx.state,
            &Incoming::new(Method::Post, "/submit/bookReview")
                .with_body("application/json", r#"{"title":"T","authorId":"a1","html":"<div></div>"}"#),
        );
        assert_eq!(empty.status, 400);
        assert_eq!(fx.store.created_count(), 1);
    }

    #[test]
    fn test_convert_preview() {
        let fx = fixture();
        let reply = handle(
            &fx.state,
            &Incoming::new(Method::Post, "/convert").with_body("text/html", "<ul><li>x</li></ul>"),
        );
        let body = body_json(&reply);
        assert_eq!(body[0]["type"], "bulleted_list_item");
    }

    #[test]
    fn test_static_and_unknown() {
        let fx = fixture();
        let file = handle(&fx.state, &Incoming::new(Method::Get, "/public/pwa.html"));
        assert_eq!(file.status, 200);
        assert_eq!(file.content_type, super::super::response::HTML);

        let escape = handle(&fx.state, &Incoming::new(Method::Get, "/public/../Cargo.toml"));
        assert_eq!(escape.status, 404);

        assert_eq!(handle(&fx.state, &Incoming::new(Method::Get, "/nope")).status, 404);
        assert_eq!(handle(&fx.state, &Incoming::new(Method::Options, "/submit/x")).status, 204);
    }
}
