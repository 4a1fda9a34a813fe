// Server module entry
// Listener setup, connection handling and the accept loop for the plugin host

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::bind_listener;
pub use server_loop::start_server_loop;
pub use signal::start_signal_handler;
