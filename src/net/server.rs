//! TCP server runtime.
//!
//! This module owns the networking concerns only: accepting connections,
//! reading raw bytes, writing raw bytes back. Request parsing lives in
//! [`http::parser`](crate::http::parser) and dispatch in
//! [`handler::router`](crate::handler::router).
//!
//! The connection model is strictly one-shot. Each accepted connection runs
//! as its own async task and walks one sequence: send the readiness probe,
//! await the first read, parse, route, write the response, close. No
//! keep-alive, no pipelining, and one read is assumed to deliver the whole
//! request. The route table is immutable once the server starts, so the
//! tasks share it without synchronization.
//!
//! The wait for the first read is bounded by the configured timeout; a
//! connection that stays silent past it is dropped without a response.

use std::net::{Shutdown, SocketAddr};
use std::sync::Arc;
use std::time::SystemTime;

use async_std::future;
use async_std::net::{TcpListener, TcpStream};
use async_std::prelude::*;
use async_std::task;
use httpdate::fmt_http_date;
use log::{debug, info};

use crate::config::config;
use crate::handler::router::Router;
use crate::http::parser;
use crate::http::response::Response;
use crate::http::status::Status;

pub struct Server {
    router: Arc<Router>,
}

impl Server {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Binds the configured address and accepts connections until the
    /// process dies, spawning a task per client.
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind((config().address, config().port)).await?;
        info!("listening on {}:{}", config().address, config().port);

        while let Ok((stream, addr)) = listener.accept().await {
            debug!("accepted connection from {addr}");
            let router = self.router.clone();
            task::spawn(async move {
                if let Err(err) = Self::handle_client(stream, &router, addr).await {
                    debug!("connection from {addr} failed: {err}");
                }
            });
        }

        Ok(())
    }

    async fn handle_client(
        mut stream: TcpStream,
        router: &Router,
        addr: SocketAddr,
    ) -> std::io::Result<()> {
        // Readiness probe: a bare 200 head goes out on accept, before any
        // request data arrives.
        let (probe, _) = Response::new(Status::Ok).build();
        stream.write_all(&probe).await?;

        let mut buffer = vec![0; config().buffer_size];
        let read = future::timeout(config().read_timeout, stream.read(&mut buffer)).await;
        let n = match read {
            Ok(result) => result?,
            Err(_) => {
                debug!("timed out waiting for a request");
                stream.shutdown(Shutdown::Both)?;
                return Ok(());
            }
        };
        if n == 0 {
            // Peer closed without sending a request.
            return Ok(());
        }

        let request = parser::parse_request(&buffer[..n]);
        let method = request.method.clone();
        let target = request.target.clone();

        let response = router.handle(request).await;
        info!(
            "[{}] {} \"{} {}\" -> {} ({} bytes)",
            fmt_http_date(SystemTime::now()),
            addr,
            method.as_deref().unwrap_or("-"),
            target.as_deref().unwrap_or("-"),
            response.status.code(),
            response.body_len(),
        );

        Self::write_response(&mut stream, &response).await?;
        stream.shutdown(Shutdown::Write)?;
        Ok(())
    }

    async fn write_response(stream: &mut TcpStream, response: &Response) -> std::io::Result<()> {
        let (head, body) = response.build();
        stream.write_all(&head).await?;
        if let Some(body) = body {
            stream.write_all(body).await?;
        }
        Ok(())
    }
}
