//! Data models module
//!
//! Request parameters and the typed views wrapping API responses

pub mod params;
pub mod resources;
pub mod view;

pub use params::{Attachment, ParamValue, Params};
pub use resources::{
    Membership, MembershipData, Message, MessageData, Person, PersonData, Room, RoomData, Webhook,
    WebhookData,
};
pub use view::View;
