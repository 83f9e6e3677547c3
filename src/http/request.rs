use indexmap::IndexMap;

use crate::http::body::Body;
use crate::http::headers::Headers;

/// A parsed incoming request.
///
/// Start-line fields are optional: a malformed start line leaves all three
/// absent, which downstream routing treats as a miss rather than an error.
/// `params` starts empty and is filled exactly once by the router before the
/// matched handler runs.
#[derive(Debug, Default)]
pub struct Request {
    pub method: Option<String>,
    pub target: Option<String>,
    pub version: Option<String>,
    pub headers: Headers,
    pub body: Body,
    pub params: IndexMap<String, String>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
