//! Messages resource

use super::require;
use crate::models::{Attachment, Message, ParamValue, Params};
use crate::services::{Paginator, Transport};
use crate::utils::error::{helpers::validation_error, SparkResult};
use tracing::debug;

const RESOURCE: &str = "messages";

/// Query for [`Messages::list`]
#[derive(Debug, Clone, Default)]
pub struct ListMessages {
    /// Room to list messages from (required)
    pub room_id: String,
    /// Only messages mentioning this person id, or `me`
    pub mentioned_people: Option<String>,
    /// Only messages sent before this ISO8601 timestamp
    pub before: Option<String>,
    /// Only messages sent before this message id
    pub before_message: Option<String>,
    /// Page size requested from the service
    pub max: Option<u32>,
}

impl ListMessages {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            ..Default::default()
        }
    }

    pub fn mentioned_people(mut self, person: impl Into<String>) -> Self {
        self.mentioned_people = Some(person.into());
        self
    }

    pub fn before(mut self, timestamp: impl Into<String>) -> Self {
        self.before = Some(timestamp.into());
        self
    }

    pub fn before_message(mut self, message_id: impl Into<String>) -> Self {
        self.before_message = Some(message_id.into());
        self
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    fn to_params(&self) -> SparkResult<Params> {
        require("roomId", &self.room_id)?;

        let mut params = Params::new().with("roomId", &self.room_id);
        params.insert_opt("mentionedPeople", self.mentioned_people.as_ref());
        params.insert_opt("before", self.before.as_ref());
        params.insert_opt("beforeMessage", self.before_message.as_ref());
        params.insert_opt("max", self.max);
        Ok(params)
    }
}

/// Payload for [`Messages::create`].
///
/// Exactly one recipient and at least one of text, markdown or a file are
/// required. A file is either a public URL or a local path to upload.
///
/// A local file goes out as the multipart field `files`, the same name the
/// JSON body uses for URLs, not the singular `file` some older clients send.
#[derive(Debug, Clone, Default)]
pub struct CreateMessage {
    pub to_room_id: Option<String>,
    pub to_person_id: Option<String>,
    pub to_person_email: Option<String>,
    pub text: Option<String>,
    pub markdown: Option<String>,
    pub files: Vec<String>,
    /// Additional fields passed through verbatim
    pub extra: Params,
}

impl CreateMessage {
    pub fn to_room(room_id: impl Into<String>) -> Self {
        Self {
            to_room_id: Some(room_id.into()),
            ..Default::default()
        }
    }

    pub fn to_person(person_id: impl Into<String>) -> Self {
        Self {
            to_person_id: Some(person_id.into()),
            ..Default::default()
        }
    }

    pub fn to_person_email(email: impl Into<String>) -> Self {
        Self {
            to_person_email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    /// Attach a public URL or a local file path
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.files.push(file.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Check recipient and content rules without touching the network
    pub fn validate(&self) -> SparkResult<()> {
        let recipients = [&self.to_room_id, &self.to_person_id, &self.to_person_email]
            .iter()
            .filter(|r| r.as_deref().is_some_and(|s| !s.is_empty()))
            .count();
        if recipients != 1 {
            return Err(validation_error(format!(
                "exactly one of toRoomId, toPersonId or toPersonEmail is required, got {}",
                recipients
            )));
        }

        if self.text.is_none() && self.markdown.is_none() && self.files.is_empty() {
            return Err(validation_error("one of text, markdown or files is required"));
        }

        if self.files.len() > 1 {
            return Err(validation_error(format!(
                "only one file can be sent per message, got {}",
                self.files.len()
            )));
        }

        Ok(())
    }

    /// Parameters and whether they need a multipart request
    async fn into_params(self) -> SparkResult<(Params, bool)> {
        self.validate()?;

        let mut params = Params::new();
        params.insert_opt("toRoomId", self.to_room_id.filter(|s| !s.is_empty()));
        params.insert_opt("toPersonId", self.to_person_id.filter(|s| !s.is_empty()));
        params.insert_opt("toPersonEmail", self.to_person_email.filter(|s| !s.is_empty()));
        params.insert_opt("text", self.text);
        params.insert_opt("markdown", self.markdown);

        let mut multipart = false;
        if let Some(file) = self.files.into_iter().next() {
            if is_url(&file) {
                params.insert("files", vec![file]);
            } else {
                debug!("Uploading local file {}", file);
                params.insert("files", Attachment::from_path(&file).await?);
                multipart = true;
            }
        }

        for (key, value) in self.extra.iter() {
            params.insert(key, value.clone());
        }

        Ok((params, multipart))
    }
}

/// Whether a file reference is a remote URL rather than a local path
pub(crate) fn is_url(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https" | "ftp") && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Messages API
#[derive(Debug, Clone)]
pub struct Messages {
    transport: Transport,
}

impl Messages {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List messages in a room, newest first
    pub async fn list(&self, query: ListMessages) -> SparkResult<Paginator<Message>> {
        let params = query.to_params()?;
        Ok(self.transport.list(RESOURCE, Some(&params)).await?.into_typed())
    }

    /// Post a message, uploading a local file when one is attached
    pub async fn create(&self, message: CreateMessage) -> SparkResult<Message> {
        let (params, multipart) = message.into_params().await?;
        let result = self.transport.create(RESOURCE, &params, multipart).await?;
        Ok(Message::from_value(result)?)
    }

    pub async fn get(&self, message_id: &str) -> SparkResult<Message> {
        require("messageId", message_id)?;
        Ok(Message::from_value(self.transport.get(RESOURCE, message_id).await?)?)
    }

    pub async fn delete(&self, message_id: &str) -> SparkResult<bool> {
        require("messageId", message_id)?;
        self.transport.delete(RESOURCE, message_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SparkError;

    #[test]
    fn test_list_params() {
        let params = ListMessages::new("R1").max(5).before_message("M0").to_params().unwrap();
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["roomId", "beforeMessage", "max"]);
    }

    #[test]
    fn test_list_requires_room() {
        assert!(matches!(ListMessages::default().to_params(), Err(SparkError::Validation(_))));
    }

    #[test]
    fn test_validate_recipients() {
        assert!(CreateMessage::to_room("R1").text("hi").validate().is_ok());
        assert!(CreateMessage::default().text("hi").validate().is_err());

        let mut two = CreateMessage::to_room("R1").text("hi");
        two.to_person_email = Some("a@b.c".to_string());
        assert!(two.validate().is_err());
    }

    #[test]
    fn test_validate_content() {
        assert!(CreateMessage::to_room("R1").validate().is_err());
        assert!(CreateMessage::to_room("R1").markdown("**x**").validate().is_ok());
        assert!(CreateMessage::to_room("R1").file("https://x.com/a.png").validate().is_ok());
        assert!(CreateMessage::to_room("R1")
            .file("https://x.com/a.png")
            .file("https://x.com/b.png")
            .validate()
            .is_err());
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a.png"));
        assert!(is_url("ftp://example.com/a.png"));
        assert!(!is_url("/tmp/a.png"));
        assert!(!is_url("a.png"));
        assert!(!is_url("file:///tmp/a.png"));
    }

    #[tokio::test]
    async fn test_url_file_is_sent_as_json() {
        let (params, multipart) = CreateMessage::to_room("R1")
            .file("https://example.com/a.png")
            .param("parentId", "P1")
            .into_params()
            .await
            .unwrap();
        assert!(!multipart);
        assert_eq!(
            params.get("files"),
            Some(&ParamValue::List(vec!["https://example.com/a.png".to_string()]))
        );
        assert!(params.contains_key("parentId"));
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let result = CreateMessage::to_room("R1")
            .file("/definitely/not/here.txt")
            .into_params()
            .await;
        assert!(matches!(result, Err(SparkError::Attachment(_))));
    }
}
