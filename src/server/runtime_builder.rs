use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::memcache::cli::parser::{MemlrudConfig, RuntimeType};
use crate::server::memc_tcp;
use crate::server::server_context::ServerContext;

fn get_worker_thread_name() -> String {
    static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
    let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
    format!("memlrud-wrk-{}", id)
}

fn create_multi_thread_runtime(worker_threads: usize) -> tokio::runtime::Runtime {
    Builder::new_multi_thread()
        .thread_name_fn(get_worker_thread_name)
        .worker_threads(worker_threads)
        .enable_all()
        .build()
        .expect("cannot build multi-thread runtime")
}

fn create_current_thread_runtime() -> tokio::runtime::Runtime {
    Builder::new_current_thread()
        .thread_name_fn(get_worker_thread_name)
        .enable_all()
        .build()
        .expect("cannot build current-thread runtime")
}

fn register_ctrlc_handler(
    runtime: &tokio::runtime::Runtime,
    cancellation_token: CancellationToken,
) {
    runtime.handle().spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c signal");
        info!("Ctrl-C received, shutting down...");
        cancellation_token.cancel();
    });
}

pub fn start_server(config: MemlrudConfig) {
    let ctxt = ServerContext::new(config.memory_limit);
    start_server_with_ctxt(config, ctxt)
}

pub fn start_server_with_ctxt(config: MemlrudConfig, ctxt: ServerContext) {
    let runtime = match config.runtime_type {
        RuntimeType::CurrentThread => create_current_thread_runtime(),
        RuntimeType::MultiThread => create_multi_thread_runtime(config.threads),
    };
    let cancellation_token = ctxt.cancellation_token();
    register_ctrlc_handler(&runtime, cancellation_token.clone());

    let addr = SocketAddr::new(config.listen_address, config.port);
    let memc_config =
        memc_tcp::MemcacheServerConfig::new(config.connection_limit, config.backlog_limit);
    let mut tcp_server =
        memc_tcp::MemcacheTcpServer::new(memc_config, ctxt.store(), cancellation_token);
    if let Err(err) = runtime.block_on(tcp_server.run(addr)) {
        error!("Server error: {}", err);
    }
}
