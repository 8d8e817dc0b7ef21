//! Spark API client library
//!
//! Async client for the Spark messaging REST API: typed resource wrappers,
//! lazy link-header pagination and classified API errors

pub mod config;
pub mod models;
pub mod resources;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use models::{Attachment, Membership, Message, ParamValue, Params, Person, Room, View, Webhook};
pub use resources::{
    CreateMessage, CreateWebhook, ListMemberships, ListMessages, ListPeople, ListRooms, UpdateWebhook,
};
pub use services::{Paginator, PaginatorState, SparkClient, Transport};
pub use utils::error::{SparkError, SparkResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
