use std::env;
use std::process;
use tracing::info;

extern crate memlru;

#[cfg(feature = "jemallocator")]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() {
    let cli_config = match memlru::memcache::cli::parser::parse(env::args().collect()) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };

    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'memlrud -v -v -v' or 'memlrud -vvv' vs 'memlrud -v')
    tracing_subscriber::fmt()
        .with_max_level(cli_config.log_level())
        .init();

    info!("memlrud version: {}", memlru::version::MEMLRU_VERSION);
    info!("Listen address: {}", cli_config.listen_address);
    info!("Listen port: {}", cli_config.port);
    info!("Connection limit: {}", cli_config.connection_limit);
    info!("Number of threads: {}", cli_config.threads);
    info!("Runtime type: {}", cli_config.runtime_type.as_str());
    info!("Memory limit: {} bytes", cli_config.memory_limit);

    memlru::server::runtime_builder::start_server(cli_config);
}
