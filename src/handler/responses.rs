use crate::http::body::Body;
use crate::http::encoding::Encodings;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::status::Status;

pub async fn root(_request: Request) -> Response {
    Response::new(Status::Ok)
}

/// Echoes the `User-Agent` request header back as the body. A missing header
/// echoes as an empty body.
pub async fn user_agent(request: Request) -> Response {
    let agent = request.header("User-Agent").unwrap_or_default();

    Response::new(Status::Ok)
        .with_header("Content-Type", "text/plain")
        .with_body(Body::from_text(agent))
}

/// Echoes the captured path segment, content-encoded when the client accepts
/// an encoding the registry supports. Unsupported values in
/// `Accept-Encoding` are ignored and the body goes out as-is.
pub async fn echo(request: Request, encodings: &Encodings) -> Response {
    let value = request.param("value").unwrap_or_default();
    let mut body = Body::from_text(value);
    let mut response = Response::new(Status::Ok).with_header("Content-Type", "text/plain");

    let negotiated = request
        .header("Accept-Encoding")
        .and_then(|accepted| encodings.negotiate(accepted));
    if let Some(name) = negotiated {
        body = encodings.encode(name, body);
        response = response.with_header("Content-Encoding", name);
    }

    response.with_body(body)
}
