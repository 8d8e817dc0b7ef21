//! Service layer module
//!
//! Contains the HTTP transport, pagination, URL building and the client facade

pub mod client;
pub mod paginator;
pub mod path;
pub mod transport;

pub use client::SparkClient;
pub use paginator::{Page, PageSource, Paginator, PaginatorState};
pub use path::build_path;
pub use transport::Transport;
