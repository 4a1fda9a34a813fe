use std::sync::Arc;
use tokio::sync::Notify;

mod app;
mod cluster;
mod config;
mod handler;
mod host;
mod http;
mod logger;
mod plugin;
mod server;

use plugin::{InstanceDisposer, Plugin};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker count follows `server.workers`, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let app = match app::App::new(&cfg.app_settings()).await {
        Ok(app) => app,
        Err(e) => {
            logger::log_error(&format!("Failed to create plugin instance: {e}"));
            return Err(e.into());
        }
    };
    let plugin: Arc<dyn Plugin> = Arc::new(app);

    let listener = server::bind_listener(addr, cfg.server.backlog)?;
    let state = Arc::new(config::AppState::new(&cfg, Arc::clone(&plugin)));
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, shutdown))
        .await;

    plugin.dispose();
    Ok(())
}
