//! Path-addressed content repository contract and adapters.
//!
//! # Architecture
//!
//! - `location.rs` - path identity inside the store
//! - `connection.rs` - the [`Repository`] operations contract
//! - `memory.rs` - in-memory adapter
//! - `fs.rs` - local-filesystem adapter

pub use connection::Repository;
pub use error::{Error, Result};
pub use fs::FsRepository;
pub use location::Location;
pub use memory::MemoryRepository;

mod connection;
mod error;
mod fs;
mod location;
mod memory;
