//! Path and method based request routing.
//!
//! Routes are registered once at startup, in priority order: the first
//! registered route whose pattern and method both match wins. A pattern is
//! either a literal path, matched exactly, or a fixed prefix followed by a
//! single `:name` marker that captures the rest of the target, e.g.
//! `/files/:filename`. One marker per pattern is enforced at registration;
//! multi-segment captures are rejected rather than left ambiguous.
//!
//! When nothing matches, the router answers with its default `404 Not Found`
//! without invoking any handler. A request whose start line failed to parse
//! has no method or target and is treated the same way.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use indexmap::IndexMap;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::status::Status;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;
pub type Handler = Box<dyn Fn(Request) -> HandlerFuture + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
    Any,
}

impl RouteMethod {
    fn matches(&self, method: &str) -> bool {
        match self {
            RouteMethod::Any => true,
            RouteMethod::Get => method == "GET",
            RouteMethod::Post => method == "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Literal(String),
    Capture { prefix: String, name: String },
}

impl Pattern {
    fn parse(pattern: &str) -> Result<Self, RouteError> {
        let Some(marker) = pattern.find(':') else {
            return Ok(Pattern::Literal(pattern.to_string()));
        };

        let prefix = &pattern[..marker];
        let name = &pattern[marker + 1..];
        if name.contains(':') {
            return Err(RouteError::MultipleCaptures(pattern.to_string()));
        }
        if name.is_empty() || name.contains('/') {
            return Err(RouteError::MalformedCapture(pattern.to_string()));
        }

        Ok(Pattern::Capture {
            prefix: prefix.to_string(),
            name: name.to_string(),
        })
    }

    /// Returns the captured params on a match, `None` on a miss. A literal
    /// pattern requires target equality; a capture pattern requires its
    /// prefix and binds the rest of the target, empty included.
    fn matches(&self, target: &str) -> Option<IndexMap<String, String>> {
        match self {
            Pattern::Literal(path) => (target == path.as_str()).then(IndexMap::new),
            Pattern::Capture { prefix, name } => target
                .strip_prefix(prefix.as_str())
                .map(|rest| IndexMap::from_iter([(name.clone(), rest.to_string())])),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    MultipleCaptures(String),
    MalformedCapture(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteError::MultipleCaptures(pattern) => {
                write!(f, "pattern {pattern:?} has more than one capture marker")
            }
            RouteError::MalformedCapture(pattern) => {
                write!(f, "pattern {pattern:?} has a malformed capture marker")
            }
        }
    }
}

impl std::error::Error for RouteError {}

struct Route {
    method: RouteMethod,
    pattern: Pattern,
    handler: Handler,
}

pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn register<F, Fut>(
        &mut self,
        method: RouteMethod,
        pattern: &str,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(pattern)?,
            handler: Box::new(move |request| Box::pin(handler(request))),
        });
        Ok(())
    }

    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.register(RouteMethod::Get, pattern, handler)
    }

    pub fn post<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.register(RouteMethod::Post, pattern, handler)
    }

    pub fn any<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.register(RouteMethod::Any, pattern, handler)
    }

    /// Dispatches a request to the first matching route.
    pub async fn handle(&self, mut request: Request) -> Response {
        let (method, target) = match (&request.method, &request.target) {
            (Some(method), Some(target)) => (method.clone(), target.clone()),
            _ => return Self::default_response(),
        };

        for route in &self.routes {
            if !route.method.matches(&method) {
                continue;
            }
            if let Some(params) = route.pattern.matches(&target) {
                request.params = params;
                return (route.handler)(request).await;
            }
        }

        Self::default_response()
    }

    fn default_response() -> Response {
        Response::new(Status::NotFound)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use async_std::task;
    use crate::http::body::Body;
    use crate::http::parser;

    fn text(body: &'static str) -> impl Fn(Request) -> HandlerFuture {
        move |_request| Box::pin(async move { Response::new(Status::Ok).with_body(Body::from_text(body)) })
    }

    fn serve(router: &Router, raw: &[u8]) -> Response {
        task::block_on(router.handle(parser::parse_request(raw)))
    }

    fn body_bytes(response: &Response) -> &[u8] {
        response.body.as_ref().map_or(&[], |body| body.as_bytes())
    }

    #[test]
    fn literal_route_requires_exact_target() {
        let mut router = Router::new();
        router.get("/", text("root")).unwrap();

        let response = serve(&router, b"GET / HTTP/1.1\r\n\r\n");
        assert_eq!(response.status, Status::Ok);

        let response = serve(&router, b"GET /other HTTP/1.1\r\n\r\n");
        assert_eq!(response.status, Status::NotFound);
    }

    #[test]
    fn capture_route_binds_the_rest_of_the_target() {
        let mut router = Router::new();
        router
            .get("/echo/:v", |request: Request| async move {
                let captured = request.param("v").unwrap_or_default().to_string();
                Response::new(Status::Ok).with_body(Body::from_text(&captured))
            })
            .unwrap();

        let response = serve(&router, b"GET /echo/hello HTTP/1.1\r\n\r\n");
        assert_eq!(body_bytes(&response), b"hello");

        let response = serve(&router, b"GET /echo/a/b/c HTTP/1.1\r\n\r\n");
        assert_eq!(body_bytes(&response), b"a/b/c");
    }

    #[test]
    fn first_registered_route_wins() {
        let mut router = Router::new();
        router.get("/echo/:v", text("first")).unwrap();
        router.get("/echo/:v", text("second")).unwrap();

        let response = serve(&router, b"GET /echo/x HTTP/1.1\r\n\r\n");
        assert_eq!(body_bytes(&response), b"first");
    }

    #[test]
    fn unmatched_target_falls_through_to_not_found() {
        let mut router = Router::new();
        router.get("/", text("root")).unwrap();

        let response = serve(&router, b"GET /missing HTTP/1.1\r\n\r\n");
        assert_eq!(response.status, Status::NotFound);
        assert!(response.body.is_none());
        assert!(response.headers.is_none());
    }

    #[test]
    fn method_must_match_exactly() {
        let mut router = Router::new();
        router.get("/submit", text("get")).unwrap();
        router.post("/submit", text("post")).unwrap();

        let response = serve(&router, b"POST /submit HTTP/1.1\r\n\r\n");
        assert_eq!(body_bytes(&response), b"post");

        // Method strings are case-sensitive.
        let response = serve(&router, b"get /submit HTTP/1.1\r\n\r\n");
        assert_eq!(response.status, Status::NotFound);
    }

    #[test]
    fn any_route_matches_every_method() {
        let mut router = Router::new();
        router.any("/user-agent", text("ua")).unwrap();

        for raw in [
            &b"GET /user-agent HTTP/1.1\r\n\r\n"[..],
            &b"POST /user-agent HTTP/1.1\r\n\r\n"[..],
            &b"DELETE /user-agent HTTP/1.1\r\n\r\n"[..],
        ] {
            let response = serve(&router, raw);
            assert_eq!(body_bytes(&response), b"ua");
        }
    }

    #[test]
    fn malformed_start_line_is_a_routing_miss() {
        let mut router = Router::new();
        router.any("/", text("root")).unwrap();

        let response = serve(&router, b"NONSENSE\r\n\r\n");
        assert_eq!(response.status, Status::NotFound);
    }

    #[test]
    fn multiple_capture_markers_are_rejected_at_registration() {
        let mut router = Router::new();

        let err = router.get("/a/:b/:c", text("nope")).unwrap_err();
        assert_eq!(err, RouteError::MultipleCaptures("/a/:b/:c".to_string()));
    }

    #[test]
    fn capture_marker_needs_a_clean_name() {
        let mut router = Router::new();

        assert_eq!(
            router.get("/files/:", text("nope")).unwrap_err(),
            RouteError::MalformedCapture("/files/:".to_string())
        );
        assert_eq!(
            router.get("/a/:b/c", text("nope")).unwrap_err(),
            RouteError::MalformedCapture("/a/:b/c".to_string())
        );
    }

    #[test]
    fn empty_capture_still_matches() {
        let mut router = Router::new();
        router
            .get("/echo/:v", |request: Request| async move {
                let captured = request.param("v").unwrap_or_default().to_string();
                Response::new(Status::Ok).with_body(Body::from_text(&captured))
            })
            .unwrap();

        let response = serve(&router, b"GET /echo/ HTTP/1.1\r\n\r\n");
        assert_eq!(response.status, Status::Ok);
        assert_eq!(body_bytes(&response), b"");
    }
}
