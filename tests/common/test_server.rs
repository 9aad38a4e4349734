use std::net::TcpStream;
use std::process;
use std::time::{Duration, Instant};

use memlru::memcache;
use memlru::server::{runtime_builder::start_server_with_ctxt, server_context::ServerContext};
use tokio_util::sync::CancellationToken;

use super::params_builder::MemlrudServerParamsBuilder;
use super::random_port;

pub struct MemlrudTestServer {
    thread_join_handle: Option<std::thread::JoinHandle<()>>,
    cancellation_token: CancellationToken,
    port: u16,
}

impl MemlrudTestServer {
    fn new(
        thread_join_handle: std::thread::JoinHandle<()>,
        cancellation_token: CancellationToken,
        port: u16,
    ) -> MemlrudTestServer {
        MemlrudTestServer {
            thread_join_handle: Some(thread_join_handle),
            cancellation_token,
            port,
        }
    }

    fn kill(&mut self) {
        self.cancellation_token.cancel();
        if let Some(thread_join_handle) = self.thread_join_handle.take() {
            thread_join_handle.join().unwrap();
        }
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    pub fn get_connection_string(&self) -> String {
        format!(
            "memcache://127.0.0.1:{}?timeout=5&tcp_nodelay=true&protocol=binary",
            self.port
        )
    }

    fn wait_until_ready(&self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if TcpStream::connect(self.address()).is_ok() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("Test server did not start listening on {}", self.address());
    }
}

impl Drop for MemlrudTestServer {
    fn drop(&mut self) {
        self.kill();
    }
}

fn spawn_server_args(args: Vec<String>) -> MemlrudTestServer {
    let config = match memcache::cli::parser::parse(args) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };
    let ctxt = ServerContext::new(config.memory_limit);
    let cancellation_token = ctxt.cancellation_token();
    let port = config.port;
    let handle = std::thread::spawn(move || start_server_with_ctxt(config, ctxt));
    MemlrudTestServer::new(handle, cancellation_token, port)
}

pub fn spawn_server(mut params: MemlrudServerParamsBuilder) -> MemlrudTestServer {
    let port = random_port::get_next_port();
    params.with_port(port);
    let args = params.build();
    let server = spawn_server_args(args);
    server.wait_until_ready();
    server
}
