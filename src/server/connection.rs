// Connection handling module
// Serves one accepted TCP connection over HTTP/1.1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::handler::StaticFileHandler;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// The request body is discarded before dispatch; no supported method reads
/// one. A body stream that fails after the headers went out ends the
/// connection, which is logged at debug level.
pub fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<StaticFileHandler>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            let handler = Arc::clone(&handler);
            async move {
                let req = req.map(|_| ());
                Ok::<_, Infallible>(handler.handle(&req, Some(peer_addr)).await)
            }
        });

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}
