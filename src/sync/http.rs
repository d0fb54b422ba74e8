use crate::config::ClientConfig;
use crate::domain::{CardId, Status};
use crate::error::{BoardError, Result};
use crate::sync::{MoveEndpoint, GENERIC_FAILURE};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use serde_json::Value;
use uuid::Uuid;

const CSRF_HEADER: &str = "X-CSRFToken";
const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
const REQUEST_ID_HEADER: &str = "X-Request-ID";
const STATUS_FIELD: &str = "status";

// Longer bodies are error pages rather than messages.
const MAX_MESSAGE_LEN: usize = 200;

/// Posts moves to the per-card endpoint of the web application
pub struct HttpMoveEndpoint {
    client: Client,
    move_url: String,
    csrf_token: String,
}

impl HttpMoveEndpoint {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            move_url: config.move_url.clone(),
            csrf_token: config.csrf_token.clone(),
        }
    }

    pub fn url_for(&self, card_id: &CardId) -> String {
        self.move_url.replace("{id}", card_id.as_str())
    }
}

#[async_trait]
impl MoveEndpoint for HttpMoveEndpoint {
    async fn send_move(&self, card_id: &CardId, target: Status) -> Result<String> {
        let url = self.url_for(card_id);
        let request_id = Uuid::new_v4();
        tracing::info!(card_id = %card_id, to = %target.as_str(), %request_id, "Sending move request");

        let response = self
            .client
            .post(&url)
            .header(CSRF_HEADER, &self.csrf_token)
            .header(REQUESTED_WITH_HEADER, "XMLHttpRequest")
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .form(&[(STATUS_FIELD, target.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%request_id, status = status.as_u16(), "Move accepted");
            return response
                .text()
                .await
                .map_err(|e| BoardError::MalformedResponse(e.to_string()));
        }

        // The body is only a hint; failing to read it still leaves a rejection.
        let body = response.text().await.unwrap_or_default();
        Err(BoardError::ServerRejected {
            status: status.as_u16(),
            message: extract_error_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        })
    }
}

/// Best-effort search of an error body for something a person can read.
///
/// Tries a JSON `error`/`message`/`detail` field first, then the text
/// content of the markup.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return ["error", "message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(collapse_whitespace)
            .filter(|message| !message.is_empty());
    }

    let fragment = Html::parse_fragment(trimmed);
    let text = collapse_whitespace(&fragment.root_element().text().collect::<Vec<_>>().join(" "));
    if text.is_empty() || text.chars().count() > MAX_MESSAGE_LEN {
        return None;
    }
    Some(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
