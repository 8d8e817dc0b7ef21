//! Rooms resource

use super::require;
use crate::models::{Params, Room};
use crate::services::{Paginator, Transport};
use crate::utils::error::SparkResult;

const RESOURCE: &str = "rooms";

/// Query for [`Rooms::list`]
#[derive(Debug, Clone, Default)]
pub struct ListRooms {
    pub team_id: Option<String>,
    /// `direct` or `group`
    pub room_type: Option<String>,
    /// `id`, `lastactivity` or `created`
    pub sort_by: Option<String>,
    pub max: Option<u32>,
}

impl ListRooms {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert_opt("teamId", self.team_id.as_ref());
        params.insert_opt("type", self.room_type.as_ref());
        params.insert_opt("sortBy", self.sort_by.as_ref());
        params.insert_opt("max", self.max);
        params
    }
}

/// Rooms API
#[derive(Debug, Clone)]
pub struct Rooms {
    transport: Transport,
}

impl Rooms {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, query: ListRooms) -> SparkResult<Paginator<Room>> {
        let params = query.to_params();
        Ok(self.transport.list(RESOURCE, Some(&params)).await?.into_typed())
    }

    pub async fn get(&self, room_id: &str) -> SparkResult<Room> {
        require("roomId", room_id)?;
        Ok(Room::from_value(self.transport.get(RESOURCE, room_id).await?)?)
    }
}
