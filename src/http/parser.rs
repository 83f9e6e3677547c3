//! Single-pass request parsing: raw bytes in, structured [`Request`] out.
//!
//! The server hands the parser everything one network read delivered and the
//! parser never asks for more; a request split across reads is out of scope
//! for this design. Malformed input degrades to absent fields instead of
//! errors, so every byte buffer parses to *some* request and the router's
//! default response covers the garbage.

use indexmap::IndexMap;

use crate::http::body::Body;
use crate::http::headers::Headers;
use crate::http::request::Request;
use crate::http::{HEAD_END, LINE_END};

/// Splits a raw buffer into start line, header lines, and body bytes.
///
/// The head is everything before the first blank line, decoded lossily as
/// UTF-8; the body is everything after it, untouched. Without a blank line
/// the whole buffer is head and the body is empty.
pub fn parse_frame(raw: &[u8]) -> (String, Vec<String>, Vec<u8>) {
    let (head, body) = match find_head_end(raw) {
        Some(at) => (&raw[..at], raw[at + HEAD_END.len()..].to_vec()),
        None => (raw, Vec::new()),
    };

    let head = String::from_utf8_lossy(head);
    let mut lines = head.split(LINE_END);
    let start_line = lines.next().unwrap_or_default().to_string();
    let header_lines = lines.map(str::to_string).collect();

    (start_line, header_lines, body)
}

fn find_head_end(raw: &[u8]) -> Option<usize> {
    raw.windows(HEAD_END.len())
        .position(|window| window == HEAD_END.as_bytes())
}

/// Splits a start line into method, target, and version.
///
/// Anything other than exactly three space-separated tokens leaves all
/// fields absent.
pub fn parse_start_line(line: &str) -> (Option<String>, Option<String>, Option<String>) {
    let mut tokens = line.split(' ');
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(target), Some(version), None) => (
            Some(method.to_string()),
            Some(target.to_string()),
            Some(version.to_string()),
        ),
        _ => (None, None, None),
    }
}

/// Parses one full request out of a raw buffer.
///
/// The body is stored as-is; no decoding happens based on `Content-Type` or
/// `Transfer-Encoding`, and the length is not checked against any declared
/// `Content-Length`.
pub fn parse_request(raw: &[u8]) -> Request {
    let (start_line, header_lines, body) = parse_frame(raw);
    let (method, target, version) = parse_start_line(&start_line);

    Request {
        method,
        target,
        version,
        headers: Headers::parse(&header_lines),
        body: Body::from_bytes(body),
        params: IndexMap::new(),
    }
}
