//! Webhooks resource

use super::require;
use crate::models::{Params, Webhook};
use crate::services::{Paginator, Transport};
use crate::utils::error::SparkResult;

const RESOURCE: &str = "webhooks";

/// Payload for [`Webhooks::create`]
#[derive(Debug, Clone, Default)]
pub struct CreateWebhook {
    pub name: String,
    pub target_url: String,
    /// Resource to watch, e.g. `messages`
    pub resource: String,
    /// Event to watch, e.g. `created`
    pub event: String,
    pub filter: Option<String>,
    /// Used by the service to sign payloads
    pub secret: Option<String>,
}

impl CreateWebhook {
    pub fn new(
        name: impl Into<String>,
        target_url: impl Into<String>,
        resource: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_url: target_url.into(),
            resource: resource.into(),
            event: event.into(),
            filter: None,
            secret: None,
        }
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    fn to_params(&self) -> SparkResult<Params> {
        require("name", &self.name)?;
        require("targetUrl", &self.target_url)?;
        require("resource", &self.resource)?;
        require("event", &self.event)?;

        let mut params = Params::new()
            .with("name", &self.name)
            .with("targetUrl", &self.target_url)
            .with("resource", &self.resource)
            .with("event", &self.event);
        params.insert_opt("filter", self.filter.as_ref());
        params.insert_opt("secret", self.secret.as_ref());
        Ok(params)
    }
}

/// Payload for [`Webhooks::update`]
#[derive(Debug, Clone, Default)]
pub struct UpdateWebhook {
    pub name: String,
    pub target_url: String,
}

impl UpdateWebhook {
    pub fn new(name: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_url: target_url.into(),
        }
    }

    fn to_params(&self) -> SparkResult<Params> {
        require("name", &self.name)?;
        require("targetUrl", &self.target_url)?;
        Ok(Params::new()
            .with("name", &self.name)
            .with("targetUrl", &self.target_url))
    }
}

/// Webhooks API
#[derive(Debug, Clone)]
pub struct Webhooks {
    transport: Transport,
}

impl Webhooks {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self, max: Option<u32>) -> SparkResult<Paginator<Webhook>> {
        let mut params = Params::new();
        params.insert_opt("max", max);
        Ok(self.transport.list(RESOURCE, Some(&params)).await?.into_typed())
    }

    pub async fn create(&self, webhook: CreateWebhook) -> SparkResult<Webhook> {
        let params = webhook.to_params()?;
        Ok(Webhook::from_value(self.transport.create(RESOURCE, &params, false).await?)?)
    }

    pub async fn get(&self, webhook_id: &str) -> SparkResult<Webhook> {
        require("webhookId", webhook_id)?;
        Ok(Webhook::from_value(self.transport.get(RESOURCE, webhook_id).await?)?)
    }

    pub async fn update(&self, webhook_id: &str, update: UpdateWebhook) -> SparkResult<Webhook> {
        require("webhookId", webhook_id)?;
        let params = update.to_params()?;
        Ok(Webhook::from_value(
            self.transport.update(RESOURCE, webhook_id, &params).await?,
        )?)
    }

    pub async fn delete(&self, webhook_id: &str) -> SparkResult<bool> {
        require("webhookId", webhook_id)?;
        self.transport.delete(RESOURCE, webhook_id).await
    }
}
