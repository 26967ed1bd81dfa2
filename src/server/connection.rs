// Connection handling module
// Serves one accepted TCP connection with the request handler tree

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;

use crate::handler::Handler;
use crate::logger::Logger;

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 with keep-alive
/// 3. Hands each request's head to the handler tree; bodies are not read
///
/// No timeouts are applied; a slow upstream validator only holds up the
/// connection that asked for it.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    handler: Arc<dyn Handler>,
    logger: Logger,
) {
    logger.debug(&format!("accepted connection from {peer_addr}"));

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<Incoming>| {
            let handler = Arc::clone(&handler);
            async move {
                let (parts, _body) = req.into_parts();
                let req = Request::from_parts(parts, ());
                Ok::<_, Infallible>(handler.handle(&req).await)
            }
        });

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger.connection_error(&err);
        }
    });
}
