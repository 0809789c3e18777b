// Connection handling module
// Accepts a single TCP connection and serves HTTP/1 requests on it

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::ServerState;
use crate::handler;
use crate::logger;

/// Accept a connection and hand it off to its own task.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    if state.cached_access_log.load(Ordering::Relaxed) {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, Arc::clone(state), peer_addr);
}

/// Serve one connection in a spawned task.
///
/// hyper's HTTP/1 parser answers malformed requests with 400 on its
/// own; everything that reaches the handler is a parsed request. An
/// error on this connection is logged and dies with its task, so the
/// accept loop never sees it.
fn handle_connection(stream: tokio::net::TcpStream, state: Arc<ServerState>, peer_addr: SocketAddr) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.http.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, state, peer_addr).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
