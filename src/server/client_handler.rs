use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use super::handler;
use crate::cache::lru_store::LruStore;
use crate::protocol::binary::connection::MemcacheBinaryConnection;
use crate::protocol::binary::decoder::BinaryRequest;

pub struct Client {
    stream: MemcacheBinaryConnection,
    addr: SocketAddr,
    handler: handler::BinaryHandler,
    /// Max connection semaphore.
    ///
    /// When the handler is dropped, a permit is returned to this semaphore. If
    /// the listener is waiting for connections to close, it will be notified of
    /// the newly available permit and resume accepting connections.
    limit_connections: Arc<Semaphore>,
}

impl Client {
    pub fn new(
        store: Arc<LruStore>,
        socket: TcpStream,
        addr: SocketAddr,
        limit_connections: Arc<Semaphore>,
    ) -> Self {
        Client {
            stream: MemcacheBinaryConnection::new(socket),
            addr,
            handler: handler::BinaryHandler::new(store),
            limit_connections,
        }
    }

    pub async fn handle(&mut self) {
        debug!("New client connected: {}", self.addr);

        loop {
            match self.stream.read_frame().await {
                Ok(Some(request)) => {
                    debug!("Got request {:?}", request.get_header());

                    // An oversize body is never drained, so the stream is out
                    // of sync after answering: drop the connection.
                    let oversize = matches!(request, BinaryRequest::TooLarge(_));

                    let response = self.handler.handle_request(request);
                    if let Err(err) = self.stream.write(&response).await {
                        error!("error on sending response; error = {:?}", err);
                        return;
                    }

                    if oversize {
                        debug!("Closing client socket, announced body too large");
                        if let Err(err) = self.stream.shutdown().await {
                            log_error(err);
                        }
                        return;
                    }
                }
                Ok(None) => {
                    debug!("Connection closed: {}", self.addr);
                    return;
                }
                Err(err) => {
                    error!("Error when reading frame; error = {:?}", err);
                    return;
                }
            }
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        // Add a permit back to the semaphore.
        //
        // Doing so unblocks the listener if the max number of
        // connections has been reached.
        //
        // This is done in a `Drop` implementation in order to guarantee that
        // the permit is added even if the task handling the connection panics.
        self.limit_connections.add_permits(1);
    }
}

fn log_error(e: io::Error) {
    // in most cases its not an error
    // client may just drop connection i.e. like
    // php client does
    if e.kind() == io::ErrorKind::NotConnected {
        info!("Error: {}", e);
    } else {
        error!("Error: {}", e);
    }
}
