// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::handler::Handler;
use crate::logger::Logger;

/// Accept connections on `listener` and serve each with `handler` until
/// `shutdown` resolves. Connections already accepted keep running on their
/// own tasks.
pub async fn serve(
    listener: TcpListener,
    handler: Arc<dyn Handler>,
    logger: Logger,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&handler), logger.clone());
                    }
                    Err(e) => {
                        logger.error(&format!("failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger.info("shutting down");
                break;
            }
        }
    }
}
