//! Resource wrappers
//!
//! Shape parameters for each API resource, call the transport and wrap the
//! returned objects in typed views

pub mod memberships;
pub mod messages;
pub mod people;
pub mod rooms;
pub mod webhooks;

use crate::utils::error::{helpers::validation_error, SparkResult};

pub use memberships::{ListMemberships, Memberships};
pub use messages::{CreateMessage, ListMessages, Messages};
pub use people::{ListPeople, People};
pub use rooms::{ListRooms, Rooms};
pub use webhooks::{CreateWebhook, UpdateWebhook, Webhooks};

/// Reject an empty required field before any request is made
pub(crate) fn require(field: &str, value: &str) -> SparkResult<()> {
    if value.trim().is_empty() {
        return Err(validation_error(format!("{} is required", field)));
    }
    Ok(())
}
