//! Route table.

use tiny_http::Method;

/// A resolved request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /`
    Root,
    /// `GET /public/<path>`
    Public(String),
    /// `GET /pwa`
    Pwa,
    /// `GET /login`
    LoginPage,
    /// `POST /login`
    Login,
    /// `POST /logout`
    Logout,
    /// `GET /api/session-status`
    SessionStatus,
    /// `GET /authors`
    Authors,
    /// `POST /submit/<type>`
    Submit(String),
    /// `POST /convert`
    Convert,
    /// `OPTIONS *`
    Preflight,
    /// Known path, wrong method
    MethodNotAllowed,
    NotFound,
}

impl Route {
    /// Resolve a method and a path (without query string).
    pub fn resolve(method: &Method, path: &str) -> Route {
        if *method == Method::Options {
            return Route::Preflight;
        }
        let get = matches!(method, Method::Get | Method::Head);
        let post = *method == Method::Post;

        let route = match path {
            "/" => get.then_some(Route::Root),
            "/pwa" => get.then_some(Route::Pwa),
            "/login" if post => Some(Route::Login),
            "/login" => get.then_some(Route::LoginPage),
            "/logout" => post.then_some(Route::Logout),
            "/api/session-status" => get.then_some(Route::SessionStatus),
            "/authors" => get.then_some(Route::Authors),
            "/convert" => post.then_some(Route::Convert),
            _ => {
                if let Some(rest) = path.strip_prefix("/public/") {
                    get.then(|| Route::Public(rest.to_string()))
                } else if let Some(kind) = path.strip_prefix("/submit/") {
                    if kind.is_empty() || kind.contains('/') {
                        return Route::NotFound;
                    }
                    post.then(|| Route::Submit(kind.to_string()))
                } else {
                    return Route::NotFound;
                }
            }
        };
        route.unwrap_or(Route::MethodNotAllowed)
    }
}

/// Split a request URL into path and query string.
pub fn split_url(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    }
}

/// First value of a query or form parameter.
pub fn param(encoded: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(Route::resolve(&Method::Get, "/"), Route::Root);
        assert_eq!(Route::resolve(&Method::Get, "/pwa"), Route::Pwa);
        assert_eq!(Route::resolve(&Method::Get, "/login"), Route::LoginPage);
        assert_eq!(Route::resolve(&Method::Post, "/login"), Route::Login);
        assert_eq!(Route::resolve(&Method::Post, "/logout"), Route::Logout);
        assert_eq!(
            Route::resolve(&Method::Get, "/api/session-status"),
            Route::SessionStatus
        );
        assert_eq!(Route::resolve(&Method::Get, "/authors"), Route::Authors);
        assert_eq!(Route::resolve(&Method::Post, "/convert"), Route::Convert);
        assert_eq!(
            Route::resolve(&Method::Post, "/submit/bookReview"),
            Route::Submit("bookReview".into())
        );
        assert_eq!(
            Route::resolve(&Method::Get, "/public/css/app.css"),
            Route::Public("css/app.css".into())
        );
    }

    #[test]
    fn test_wrong_methods_and_unknown_paths() {
        assert_eq!(Route::resolve(&Method::Options, "/anything"), Route::Preflight);
        assert_eq!(Route::resolve(&Method::Get, "/submit/bookReview"), Route::MethodNotAllowed);
        assert_eq!(Route::resolve(&Method::Delete, "/authors"), Route::MethodNotAllowed);
        assert_eq!(Route::resolve(&Method::Post, "/submit/"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::Post, "/submit/a/b"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::Get, "/admin"), Route::NotFound);
    }

    #[test]
    fn test_split_url_and_params() {
        assert_eq!(split_url("/authors?search=jo%20m"), ("/authors", "search=jo%20m"));
        assert_eq!(split_url("/pwa"), ("/pwa", ""));
        assert_eq!(param("search=jo%20m&x=1", "search").as_deref(), Some("jo m"));
        assert_eq!(param("password=a+b", "password").as_deref(), Some("a b"));
        assert_eq!(param("", "search"), None);
    }
}
