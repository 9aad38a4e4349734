use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::client_handler::Client;
use crate::cache::lru_store::LruStore;

#[derive(Copy, Clone)]
pub struct MemcacheServerConfig {
    connection_limit: u32,
    backlog_limit: u32,
}

impl MemcacheServerConfig {
    pub fn new(connection_limit: u32, backlog_limit: u32) -> Self {
        MemcacheServerConfig {
            connection_limit,
            backlog_limit,
        }
    }
}

pub struct MemcacheTcpServer {
    config: MemcacheServerConfig,
    storage: Arc<LruStore>,
    limit_connections: Arc<Semaphore>,
    cancellation_token: CancellationToken,
}

impl MemcacheTcpServer {
    pub fn new(
        config: MemcacheServerConfig,
        store: Arc<LruStore>,
        cancellation_token: CancellationToken,
    ) -> MemcacheTcpServer {
        MemcacheTcpServer {
            config,
            storage: store,
            limit_connections: Arc::new(Semaphore::new(config.connection_limit as usize)),
            cancellation_token,
        }
    }

    pub async fn run(&mut self, addr: SocketAddr) -> io::Result<()> {
        let listener = self.bind(addr)?;
        info!("Listening on: {}", addr);
        loop {
            tokio::select! {
                connection = listener.accept() => {
                    match connection {
                        Ok((socket, peer_addr)) => {
                            if let Err(err) = MemcacheTcpServer::setup_socket(&socket) {
                                error!("Cannot configure client socket: {}", err);
                                continue;
                            }
                            let mut client = Client::new(
                                self.storage.clone(),
                                socket,
                                peer_addr,
                                self.limit_connections.clone(),
                            );

                            self.limit_connections.acquire().await.unwrap().forget();
                            // Spawn the session so it runs concurrently with
                            // every other client.
                            tokio::spawn(async move { client.handle().await });
                        }
                        Err(err) => {
                            error!("Accept error: {}", err);
                        }
                    }
                },
                _ = self.cancellation_token.cancelled() => {
                    info!("Shutdown requested, stopping accept loop");
                    return Ok(());
                },
            }
        }
    }

    fn bind(&self, addr: SocketAddr) -> io::Result<TcpListener> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        socket.listen(self.config.backlog_limit)
    }

    fn setup_socket(socket: &TcpStream) -> io::Result<()> {
        socket.set_nodelay(true)?;
        socket.set_linger(Some(Duration::from_secs(0)))
    }
}
