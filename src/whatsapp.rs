//! WhatsApp Cloud API client: one authenticated POST per outbound message.

use crate::payload::{MessageRequest, OutboundPayload};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

/// Outbound delivery failed. `Request` is a transport problem, `Api` a
/// non-2xx answer from the platform; neither is retried here.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("whatsapp request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("whatsapp api error: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Body of a successful /messages response.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub messages: Vec<SentMessageId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentMessageId {
    pub id: String,
}

#[derive(Clone)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    base_url: String,
    phone_number_id: String,
    access_token: String,
}

impl WhatsAppClient {
    pub fn new(base_url: &str, phone_number_id: &str, access_token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            phone_number_id: phone_number_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Send one payload to a recipient. At most one delivery attempt; the
    /// caller decides what a failure means for the rest of the batch.
    pub async fn send(
        &self,
        to: &str,
        payload: OutboundPayload,
    ) -> Result<SendResponse, DeliveryError> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);
        let request = MessageRequest::new(to, payload);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("WhatsApp API error: {} {}", status, body);
            return Err(DeliveryError::Api { status, body });
        }

        let sent: SendResponse = response.json().await?;
        if let Some(message) = sent.messages.first() {
            info!("Message sent to {} ({})", to, message.id);
        } else {
            info!("Message sent to {}", to);
        }
        Ok(sent)
    }
}
