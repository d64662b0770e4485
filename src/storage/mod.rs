//! Storage implementations for different backends

pub mod in_memory;
pub mod local_file;
#[cfg(feature = "remote")]
pub mod remote;

pub use in_memory::InMemoryStore;
pub use local_file::LocalFileStore;
#[cfg(feature = "remote")]
pub use remote::RemoteStore;
