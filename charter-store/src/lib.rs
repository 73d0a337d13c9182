pub mod app_config;
pub mod memory;
pub mod remote;

pub use app_config::{BackendMode, Config};
pub use memory::InMemoryBackend;
pub use remote::RemoteBackend;
