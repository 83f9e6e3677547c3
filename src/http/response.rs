use crate::http::body::Body;
use crate::http::headers::Headers;
use crate::http::status::Status;
use crate::http::{HEAD_END, LINE_END};

/// An outgoing response, built fresh per request by a handler or by the
/// router's default.
///
/// Framing invariant: when a body is present, the serialized head always
/// carries a `Content-Length` that matches the bytes actually sent. The
/// builder injects the computed length ahead of any handler-supplied
/// headers; a handler that sets `Content-Length` itself takes precedence.
#[derive(Debug)]
pub struct Response {
    pub status: Status,
    pub headers: Option<Headers>,
    pub body: Option<Body>,
}

impl Response {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: None,
            body: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.get_or_insert_with(Headers::new).set(name, value);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialized head plus a borrow of the body bytes, ready to write.
    pub fn build(&self) -> (Vec<u8>, Option<&[u8]>) {
        let headers = self.wire_headers();
        let head = if headers.is_empty() {
            format!("{}{}", self.status.line(), HEAD_END)
        } else {
            format!(
                "{}{}{}{}",
                self.status.line(),
                LINE_END,
                headers.serialize(),
                HEAD_END
            )
        };

        (head.into_bytes(), self.body.as_ref().map(Body::as_bytes))
    }

    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Body::len)
    }

    fn wire_headers(&self) -> Headers {
        let mut wire = Headers::new();
        if let Some(body) = &self.body {
            wire.set("Content-Length", &body.len().to_string());
        }
        if let Some(headers) = &self.headers {
            wire.extend_from(headers);
        }
        wire
    }
}
