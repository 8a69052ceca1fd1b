//! Library to sync data between repository hosts and Isshub.

pub mod adapters;
pub mod config;
pub mod connection;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::ReqwestClient;
pub use config::toml_config::{ForgeConfig, ForgeKind, SyncConfig};
pub use connection::{
    Callable, Connection, DataMode, Executable, HttpMethod, Node, RequestOptions,
};
pub use domain::dict_object::{DictObject, Entry};
pub use domain::model::{HttpResponse, OutgoingRequest, RequestBody};
pub use domain::ports::ConnectionClient;
pub use utils::error::{Result, SyncError};

/// Crate version, as declared in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
