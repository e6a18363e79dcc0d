//! Control server
//!
//! Binds the control socket, accepts connections and runs one detached
//! handler per connection.

pub mod context;
pub mod core;
pub mod handler;

pub use context::ControlContext;
pub use self::core::{ControlServer, bind_local_socket, max_socket_path_len};
pub use handler::{handle_connection, read_request};
