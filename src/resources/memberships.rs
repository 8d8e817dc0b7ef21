//! Memberships resource

use super::require;
use crate::models::{Membership, Params};
use crate::services::{Paginator, Transport};
use crate::utils::error::SparkResult;

const RESOURCE: &str = "memberships";

/// Query for [`Memberships::list`]
#[derive(Debug, Clone, Default)]
pub struct ListMemberships {
    pub room_id: Option<String>,
    pub person_id: Option<String>,
    pub person_email: Option<String>,
    pub max: Option<u32>,
}

impl ListMemberships {
    pub fn in_room(room_id: impl Into<String>) -> Self {
        Self {
            room_id: Some(room_id.into()),
            ..Default::default()
        }
    }

    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert_opt("roomId", self.room_id.as_ref());
        params.insert_opt("personId", self.person_id.as_ref());
        params.insert_opt("personEmail", self.person_email.as_ref());
        params.insert_opt("max", self.max);
        params
    }
}

/// Memberships API
#[derive(Debug, Clone)]
pub struct Memberships {
    transport: Transport,
}

impl Memberships {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, query: ListMemberships) -> SparkResult<Paginator<Membership>> {
        let params = query.to_params();
        Ok(self.transport.list(RESOURCE, Some(&params)).await?.into_typed())
    }

    pub async fn get(&self, membership_id: &str) -> SparkResult<Membership> {
        require("membershipId", membership_id)?;
        Ok(Membership::from_value(
            self.transport.get(RESOURCE, membership_id).await?,
        )?)
    }
}
