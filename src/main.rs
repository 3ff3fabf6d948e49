use std::sync::Arc;

use spa_static_server::config::{self, AppState};
use spa_static_server::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument names the config file (without extension)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    cfg.validate()?;

    // Build the Tokio runtime, honoring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg)?;

    let state = Arc::new(AppState::new(&cfg)?);
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let shutdown = Arc::new(server::Shutdown::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_server_start(&listener.local_addr()?, &state.root, &cfg);

    server::start_server_loop(listener, state, &shutdown).await?;
    Ok(())
}
