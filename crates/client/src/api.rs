//! Reqwest-backed API client.
//!
//! [`MarketplaceApi`] is the seam the views depend on; [`MarketplaceClient`]
//! implements it over HTTP. Non-success responses become
//! [`ClientError::Status`] carrying the server's error message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::error::ClientError;
use crate::model::{
    Comment, ImageFile, NewComment, NewTopic, Topic, TopicCreatedEnvelope, TopicUpdate,
    TopicsEnvelope,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the marketplace API offers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Every listing, newest first.
    async fn list_topics(&self) -> Result<Vec<Topic>, ClientError>;

    /// One listing by id.
    async fn get_topic(&self, id: Uuid) -> Result<Topic, ClientError>;

    /// Create a listing with its image.
    async fn create_topic(&self, topic: NewTopic) -> Result<Topic, ClientError>;

    /// Apply a sparse update, optionally replacing the image.
    async fn update_topic(&self, id: Uuid, update: TopicUpdate) -> Result<Topic, ClientError>;

    /// Delete a listing with its comments and image.
    async fn delete_topic(&self, id: Uuid) -> Result<(), ClientError>;

    /// Comments on a listing, newest first.
    async fn list_comments(&self, topic_id: Uuid) -> Result<Vec<Comment>, ClientError>;

    /// Add a comment to a listing.
    async fn create_comment(&self, comment: NewComment) -> Result<Comment, ClientError>;

    /// Replace a comment's content.
    async fn update_comment(&self, id: Uuid, content: String) -> Result<Comment, ClientError>;

    /// Delete a comment.
    async fn delete_comment(&self, id: Uuid) -> Result<(), ClientError>;

    /// Raw bytes behind a public image path such as `/uploads/<file>`.
    async fn fetch_image(&self, path: String) -> Result<Vec<u8>, ClientError>;
}

/// Client connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8080/`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for `base_url` with a 30 second timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP implementation of [`MarketplaceApi`].
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    client: Client,
    base_url: Url,
}

impl MarketplaceClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] when the reqwest client cannot be
    /// constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::request(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Server root every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::request(format!("invalid path {path}: {err}")))
    }
}

async fn send_raw(request: RequestBuilder) -> Result<Vec<u8>, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(ClientError::from_status(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let body = send_raw(request).await?;
    serde_json::from_slice(&body).map_err(|err| ClientError::decode(err.to_string()))
}

fn image_part(image: ImageFile) -> Result<Part, ClientError> {
    let ImageFile {
        file_name,
        content_type,
        bytes,
    } = image;
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(&content_type)
        .map_err(|err| ClientError::request(format!("invalid content type {content_type}: {err}")))
}

fn create_form(topic: NewTopic) -> Result<Form, ClientError> {
    let NewTopic {
        title,
        description,
        price,
        image,
        user_email,
        category,
    } = topic;
    let form = Form::new()
        .text("title", title)
        .text("description", description)
        .text("price", price)
        .text("userEmail", user_email)
        .part("image", image_part(image)?);
    Ok(match category {
        Some(category) => form.text("category", category),
        None => form,
    })
}

fn update_form(update: TopicUpdate) -> Result<Form, ClientError> {
    let TopicUpdate {
        title,
        description,
        price,
        category,
        new_image,
        old_image,
    } = update;
    let texts = [
        ("title", title),
        ("description", description),
        ("price", price),
        ("category", category),
        ("oldImage", old_image),
    ];
    let mut form = texts
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    if let Some(image) = new_image {
        form = form.part("newImage", image_part(image)?);
    }
    Ok(form)
}

#[async_trait]
impl MarketplaceApi for MarketplaceClient {
    async fn list_topics(&self) -> Result<Vec<Topic>, ClientError> {
        let envelope: TopicsEnvelope =
            send_json(self.client.get(self.url("/api/topics")?)).await?;
        Ok(envelope.topics)
    }

    async fn get_topic(&self, id: Uuid) -> Result<Topic, ClientError> {
        send_json(self.client.get(self.url(&format!("/api/topics/{id}"))?)).await
    }

    async fn create_topic(&self, topic: NewTopic) -> Result<Topic, ClientError> {
        let request = self
            .client
            .post(self.url("/api/topics")?)
            .multipart(create_form(topic)?);
        let envelope: TopicCreatedEnvelope = send_json(request).await?;
        Ok(envelope.new_topic)
    }

    async fn update_topic(&self, id: Uuid, update: TopicUpdate) -> Result<Topic, ClientError> {
        let request = self
            .client
            .put(self.url(&format!("/api/topics/{id}"))?)
            .multipart(update_form(update)?);
        send_json(request).await
    }

    async fn delete_topic(&self, id: Uuid) -> Result<(), ClientError> {
        let mut url = self.url("/api/topics")?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        send_json::<serde_json::Value>(self.client.delete(url)).await?;
        Ok(())
    }

    async fn list_comments(&self, topic_id: Uuid) -> Result<Vec<Comment>, ClientError> {
        let mut url = self.url("/api/comments")?;
        url.query_pairs_mut()
            .append_pair("topicId", &topic_id.to_string());
        send_json(self.client.get(url)).await
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, ClientError> {
        send_json(self.client.post(self.url("/api/comments")?).json(&comment)).await
    }

    async fn update_comment(&self, id: Uuid, content: String) -> Result<Comment, ClientError> {
        let body = serde_json::json!({ "content": content });
        send_json(
            self.client
                .put(self.url(&format!("/api/comments/{id}"))?)
                .json(&body),
        )
        .await
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), ClientError> {
        send_json::<serde_json::Value>(
            self.client
                .delete(self.url(&format!("/api/comments/{id}"))?),
        )
        .await?;
        Ok(())
    }

    async fn fetch_image(&self, path: String) -> Result<Vec<u8>, ClientError> {
        send_raw(self.client.get(self.url(&path)?)).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn client(base: &str) -> MarketplaceClient {
        MarketplaceClient::new(ClientConfig::new(Url::parse(base).expect("base url")))
            .expect("client")
    }

    #[rstest]
    #[case("http://localhost:8080", "/api/topics", "http://localhost:8080/api/topics")]
    #[case("http://localhost:8080/", "/uploads/a.png", "http://localhost:8080/uploads/a.png")]
    fn paths_resolve_against_the_base_url(
        #[case] base: &str,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(client(base).url(path).expect("url").as_str(), expected);
    }

    #[rstest]
    fn invalid_image_content_types_are_rejected_before_sending() {
        let err = image_part(ImageFile {
            file_name: "a.png".to_owned(),
            content_type: "not a mime".to_owned(),
            bytes: vec![1],
        })
        .expect_err("invalid mime");
        assert!(matches!(err, ClientError::Request { .. }));
    }
}
