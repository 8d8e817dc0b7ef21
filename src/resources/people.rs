//! People resource

use super::require;
use crate::models::{Params, Person};
use crate::services::{Paginator, Transport};
use crate::utils::error::SparkResult;

const RESOURCE: &str = "people";

/// Query for [`People::list`]
#[derive(Debug, Clone, Default)]
pub struct ListPeople {
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Comma separated person ids
    pub id: Option<String>,
    pub org_id: Option<String>,
    pub max: Option<u32>,
}

impl ListPeople {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn by_display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert_opt("email", self.email.as_ref());
        params.insert_opt("displayName", self.display_name.as_ref());
        params.insert_opt("id", self.id.as_ref());
        params.insert_opt("orgId", self.org_id.as_ref());
        params.insert_opt("max", self.max);
        params
    }
}

/// People API
#[derive(Debug, Clone)]
pub struct People {
    transport: Transport,
}

impl People {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, query: ListPeople) -> SparkResult<Paginator<Person>> {
        let params = query.to_params();
        Ok(self.transport.list(RESOURCE, Some(&params)).await?.into_typed())
    }

    pub async fn get(&self, person_id: &str) -> SparkResult<Person> {
        require("personId", person_id)?;
        Ok(Person::from_value(self.transport.get(RESOURCE, person_id).await?)?)
    }

    /// The account the access token belongs to
    pub async fn me(&self) -> SparkResult<Person> {
        self.get("me").await
    }
}
