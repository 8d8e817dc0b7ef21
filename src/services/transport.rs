//! Authenticated HTTP transport
//!
//! Issues one request per operation against `base_url/resource[/id]`, checks the
//! status the operation expects and classifies everything else.

use crate::config::ApiConfig;
use crate::models::{ParamValue, Params};
use crate::services::paginator::{Page, PageSource, Paginator};
use crate::services::path::build_path;
use crate::utils::error::{SparkError, SparkResult};
use crate::utils::logging::body_summary;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, LINK};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Low level client shared by every resource wrapper.
///
/// Cloning is cheap: clones share the connection pool and the credential.
/// Closing any clone releases the pool for all of them.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Arc<RwLock<Option<Client>>>,
    base_url: String,
    authorization: HeaderValue,
}

impl Transport {
    /// Create a transport with its own connection pool
    pub fn new(config: &ApiConfig) -> SparkResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Self::with_client(client, &config.base_url, &config.access_token)
    }

    /// Create a transport over an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: &str, access_token: &str) -> SparkResult<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|_| SparkError::Validation("access token contains invalid header characters".to_string()))?;
        authorization.set_sensitive(true);

        Ok(Self {
            client: Arc::new(RwLock::new(Some(client))),
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Drop the connection pool; every later call on any clone fails with
    /// [`SparkError::Closed`]. Requests already in flight finish normally.
    pub fn close(&self) {
        let released = match self.client.write() {
            Ok(mut slot) => slot.take().is_some(),
            Err(poisoned) => poisoned.into_inner().take().is_some(),
        };
        if released {
            debug!("Transport for {} closed", self.base_url);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client.read().map(|slot| slot.is_none()).unwrap_or(true)
    }

    /// Handle on the shared pool, unless the transport was closed
    fn client(&self) -> SparkResult<Client> {
        self.client
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(SparkError::Closed)
    }

    /// Fresh header set for one call
    fn headers(&self, json_body: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        if json_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers
    }

    /// List a resource; later pages are fetched lazily by the returned paginator
    pub async fn list(&self, resource: &str, params: Option<&Params>) -> SparkResult<Paginator> {
        let url = build_path(&self.base_url, resource, None, params)?;
        let first = self.fetch_page(&url).await?.unlink_self(&url);
        Ok(Paginator::new(first, Arc::new(self.clone())))
    }

    /// Fetch a single object by id
    pub async fn get(&self, resource: &str, id: &str) -> SparkResult<Value> {
        let url = build_path(&self.base_url, resource, Some(id), None)?;
        debug!("GET {}", url);

        let response = self.client()?.get(&url).headers(self.headers(false)).send().await?;
        self.read_json(response, "GET", &url).await
    }

    /// Create an object.
    ///
    /// With `multipart` the parameters are sent as form fields, a file value
    /// becomes a named file part. Otherwise they are sent as a JSON object.
    pub async fn create(&self, resource: &str, params: &Params, multipart: bool) -> SparkResult<Value> {
        let url = build_path(&self.base_url, resource, None, None)?;
        debug!("POST {} (multipart: {})", url, multipart);

        let client = self.client()?;
        let request = if multipart {
            client
                .post(&url)
                .headers(self.headers(false))
                .multipart(multipart_form(params)?)
        } else {
            client
                .post(&url)
                .headers(self.headers(true))
                .body(serde_json::to_vec(&params.to_json()?)?)
        };

        let response = request.send().await?;
        self.read_json(response, "POST", &url).await
    }

    /// Replace an object by id
    pub async fn update(&self, resource: &str, id: &str, params: &Params) -> SparkResult<Value> {
        let url = build_path(&self.base_url, resource, Some(id), None)?;
        debug!("PUT {}", url);

        let response = self
            .client()?
            .put(&url)
            .headers(self.headers(true))
            .body(serde_json::to_vec(&params.to_json()?)?)
            .send()
            .await?;
        self.read_json(response, "PUT", &url).await
    }

    /// Delete an object by id; the service answers 204 without a body
    pub async fn delete(&self, resource: &str, id: &str) -> SparkResult<bool> {
        let url = build_path(&self.base_url, resource, Some(id), None)?;
        debug!("DELETE {}", url);

        let response = self.client()?.delete(&url).headers(self.headers(false)).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(true);
        }
        Err(failure(response, "DELETE", &url).await)
    }

    async fn read_json(&self, response: Response, method: &str, url: &str) -> SparkResult<Value> {
        if response.status() != StatusCode::OK {
            return Err(failure(response, method, url).await);
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl PageSource for Transport {
    async fn fetch_page(&self, url: &str) -> SparkResult<Page> {
        debug!("GET {}", url);

        let response = self.client()?.get(url).headers(self.headers(false)).send().await?;
        if response.status() != StatusCode::OK {
            return Err(failure(response, "GET", url).await);
        }

        let links: Vec<String> = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        let bytes = response.bytes().await?;
        Page::from_parts(&bytes, links.iter().map(String::as_str))
    }
}

/// Classify a failed response and log it
async fn failure(response: Response, method: &str, url: &str) -> SparkError {
    let error = SparkError::from_response(response).await;
    let body = error.body().map(body_summary).unwrap_or_default();

    match &error {
        SparkError::ServerError { status, .. } => {
            error!("{} {} failed with status {}: {}", method, url, status, body)
        }
        SparkError::TooManyRequests { retry_after, .. } => {
            warn!("{} {} rate limited, retry after {}s", method, url, retry_after)
        }
        other => warn!("{} {} failed ({}): {}", method, url, other.error_type(), body),
    }

    error
}

/// Build a multipart form, files as file parts and everything else as text
fn multipart_form(params: &Params) -> SparkResult<Form> {
    let files = params.iter().filter(|(_, v)| matches!(v, ParamValue::File(_))).count();
    if files > 1 {
        return Err(SparkError::Validation(format!(
            "a multipart request carries at most one file, got {}",
            files
        )));
    }

    let mut form = Form::new();
    for (key, value) in params.iter() {
        form = match value {
            ParamValue::File(attachment) => {
                let part = Part::bytes(attachment.content.clone()).file_name(attachment.name.clone());
                form.part(key.to_string(), part)
            }
            other => form.text(key.to_string(), other.to_text()),
        };
    }
    Ok(form)
}
