//! Authorized client bookkeeping
//!
//! Holds the client records and the registry shared by every control handler.

pub mod registry;
pub mod state;

pub use registry::{ClientRegistry, SharedRegistry, new_shared_registry};
pub use state::ClientRecord;
