mod config;
mod handler;
mod http;
mod net;

use std::io::{Error, ErrorKind};

use async_std::task;

use crate::config::{ServerConfig, config, set_config};
use crate::http::encoding::Encodings;
use crate::net::server::Server;

fn main() -> std::io::Result<()> {
    stderrlog::new()
        .module(module_path!())
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
        .expect("logger init");

    let args: Vec<String> = std::env::args().collect();
    let mut cfg = match arg_value(&args, "--config") {
        Some(path) => ServerConfig::from_file(&path),
        None => ServerConfig::default(),
    };
    if let Some(directory) = arg_value(&args, "--directory") {
        cfg.files_root = directory.into();
    }
    set_config(cfg);

    let router = handler::routes(config().files_root.clone(), Encodings::default())
        .map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;

    let server = Server::new(router);
    task::block_on(server.run())
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg.as_str() == name)
        .and_then(|at| args.get(at + 1))
        .cloned()
}
