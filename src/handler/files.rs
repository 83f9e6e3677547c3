use std::path::{Path, PathBuf};

use async_std::fs;
use log::{debug, warn};

use crate::http::body::Body;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::status::Status;

/// Serves the captured file name from under `root`. Anything that cannot be
/// read comes back as the 404 default.
pub async fn get_file(request: Request, root: &Path) -> Response {
    let Some(path) = resolve(root, request.param("name")) else {
        return Response::new(Status::NotFound);
    };

    match fs::read(&path).await {
        Ok(bytes) => Response::new(Status::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_body(Body::from_bytes(bytes)),
        Err(err) => {
            debug!("read {path:?} failed: {err}");
            Response::new(Status::NotFound)
        }
    }
}

/// Writes the request body to the captured file name under `root`.
pub async fn save_file(request: Request, root: &Path) -> Response {
    let Some(path) = resolve(root, request.param("name")) else {
        return Response::new(Status::NotFound);
    };

    match fs::write(&path, request.body.as_bytes()).await {
        Ok(()) => Response::new(Status::Created),
        Err(err) => {
            warn!("write {path:?} failed: {err}");
            Response::new(Status::NotFound)
        }
    }
}

/// The captured name must be a single path component; separators and `..`
/// would escape the serving root.
fn resolve(root: &Path, name: Option<&str>) -> Option<PathBuf> {
    let name = name?;
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
        warn!("rejected file name {name:?}");
        return None;
    }
    Some(root.join(name))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_accepts_plain_file_names() {
        let root = Path::new("/srv/files");

        assert_eq!(
            resolve(root, Some("a.txt")),
            Some(PathBuf::from("/srv/files/a.txt"))
        );
        assert_eq!(
            resolve(root, Some("dotted..name")),
            Some(PathBuf::from("/srv/files/dotted..name"))
        );
    }

    #[test]
    fn resolve_rejects_traversal_attempts() {
        let root = Path::new("/srv/files");

        assert_eq!(resolve(root, Some("../etc/passwd")), None);
        assert_eq!(resolve(root, Some("..")), None);
        assert_eq!(resolve(root, Some("a/b")), None);
        assert_eq!(resolve(root, Some("a\\b")), None);
        assert_eq!(resolve(root, Some("")), None);
        assert_eq!(resolve(root, None), None);
    }
}
