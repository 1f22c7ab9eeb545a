use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use astra::{Body, Request, Response};

use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::mailings::MockProvider;
use crate::router::AppState;

/// Returns a fresh test database using the production schema.
pub fn make_db(prefix: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{prefix}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
    db
}

/// App state wired to the instant mock provider, so dispatch tests run
/// without sleeping.
pub fn make_state(prefix: &str) -> AppState {
    AppState {
        db: make_db(prefix),
        provider: Box::new(MockProvider::instant()),
        config: AppConfig::default(),
    }
}

// Requests are assembled with the `http` builder; `astra::Request` is an
// alias for `http::Request<astra::Body>`, so the builder's output unifies
// with what `handle` expects.
pub fn get(path: &str) -> Request {
    http::Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn post(path: &str, content_type: &str, body: &str) -> Request {
    http::Request::builder()
        .method("POST")
        .uri(path)
        .header("Content-Type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn body_string(resp: &mut Response) -> String {
    let mut buf = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .expect("Failed to read response body");
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn header<'a>(resp: &'a Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
