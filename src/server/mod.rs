// Server module entry point
// Binds the listener, accepts connections and stops on a signal

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), hence server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::{bind, create_listener};
pub use server_loop::serve;
pub use signal::shutdown_signal;
