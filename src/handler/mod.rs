mod files;
mod responses;
pub mod router;

use std::path::PathBuf;
use std::sync::Arc;

use crate::handler::router::{RouteError, Router};
use crate::http::encoding::Encodings;

/// Builds the route table. Registration order is match priority; the
/// encoding registry and the file-serving root are moved in here once and
/// shared by the handlers that need them.
pub fn routes(files_root: PathBuf, encodings: Encodings) -> Result<Router, RouteError> {
    let encodings = Arc::new(encodings);
    let files_root = Arc::new(files_root);

    let mut router = Router::new();
    router.get("/", responses::root)?;
    router.any("/user-agent", responses::user_agent)?;

    router.get("/echo/:value", move |request| {
        let encodings = encodings.clone();
        async move { responses::echo(request, &encodings).await }
    })?;

    let root = files_root.clone();
    router.get("/files/:name", move |request| {
        let root = root.clone();
        async move { files::get_file(request, root.as_path()).await }
    })?;

    let root = files_root;
    router.post("/files/:name", move |request| {
        let root = root.clone();
        async move { files::save_file(request, root.as_path()).await }
    })?;

    Ok(router)
}
