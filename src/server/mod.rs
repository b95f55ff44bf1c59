// Server module entry point
// Startup, connection acceptance and shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};

/// Bind the configured port and serve the working directory until SIGINT/SIGTERM.
pub async fn run(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::from_current_dir(cfg)?);

    let listener = create_listener(addr).map_err(|e| format!("Failed to bind {addr}: {e}"))?;
    let local_addr = listener.local_addr()?;
    logger::log_server_start(&local_addr, &state.root);

    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals))?;

    start_server_loop(listener, state, Arc::clone(&signals.shutdown)).await;
    Ok(())
}
