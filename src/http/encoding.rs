//! Named content-encoding transforms, applied to response bodies during
//! content negotiation.
//!
//! The registry is built once at startup and handed to the handlers that
//! negotiate encodings; it is never mutated afterwards. Asking for an
//! unregistered encoding is not an error: the body passes through unchanged,
//! mirroring how a server quietly ignores an `Accept-Encoding` it cannot
//! satisfy.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use indexmap::IndexMap;
use log::warn;

use crate::http::body::Body;

type EncodeFn = fn(&[u8]) -> std::io::Result<Vec<u8>>;

pub struct Encodings {
    transforms: IndexMap<String, EncodeFn>,
}

impl Encodings {
    pub fn new() -> Self {
        Self {
            transforms: IndexMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, transform: EncodeFn) {
        self.transforms.insert(name.to_string(), transform);
    }

    pub fn is_supported(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Applies the named transform to `body`.
    ///
    /// An unknown name is a silent pass-through. A transform failure is
    /// logged and also passes the body through unchanged, so callers always
    /// get a sendable body back.
    pub fn encode(&self, name: &str, body: Body) -> Body {
        let Some(transform) = self.transforms.get(name) else {
            return body;
        };
        match transform(body.as_bytes()) {
            Ok(bytes) => Body::from_bytes(bytes),
            Err(err) => {
                warn!("{name} encoding failed, sending body unencoded: {err}");
                body
            }
        }
    }

    /// Picks the first supported name out of a comma-separated
    /// `Accept-Encoding` value.
    pub fn negotiate<'a>(&self, accepted: &'a str) -> Option<&'a str> {
        accepted
            .split(',')
            .map(str::trim)
            .find(|name| self.is_supported(name))
    }
}

impl Default for Encodings {
    fn default() -> Self {
        let mut encodings = Self::new();
        encodings.register("gzip", gzip);
        encodings
    }
}

fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

#[cfg(test)]
mod test {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn gzip_is_registered_by_default() {
        let encodings = Encodings::default();

        assert!(encodings.is_supported("gzip"));
        assert!(!encodings.is_supported("br"));
    }

    #[test]
    fn gzip_output_decompresses_to_the_input() {
        let encodings = Encodings::default();

        let body = encodings.encode("gzip", Body::from_text("abc"));

        let mut decoder = GzDecoder::new(body.as_bytes());
        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "abc");
    }

    #[test]
    fn unknown_encoding_passes_body_through() {
        let encodings = Encodings::default();

        let body = encodings.encode("zstd", Body::from_text("abc"));

        assert_eq!(body.as_bytes(), b"abc");
    }

    #[test]
    fn negotiate_picks_first_supported_name() {
        let encodings = Encodings::default();

        assert_eq!(encodings.negotiate("gzip"), Some("gzip"));
        assert_eq!(encodings.negotiate("identity, gzip, br"), Some("gzip"));
        assert_eq!(encodings.negotiate("identity, br"), None);
    }
}
