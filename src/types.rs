//! Inbound webhook event model.
//!
//! The Cloud API delivers events as `entry -> changes -> value -> messages`.
//! Deliveries that carry no messages (status updates, contact sync) simply
//! deserialize to empty lists.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    /// Account type this delivery is for; anything other than
    /// `whatsapp_business_account` is ignored.
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    pub value: ChangeValue,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    /// Sender phone number, used as the reply recipient.
    pub from: String,
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub interactive: Option<InteractiveReply>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractiveReply {
    #[serde(rename = "type")]
    pub reply_type: String,
    #[serde(default)]
    pub list_reply: Option<ListReply>,
}

/// Row selection from an interactive list message.
#[derive(Debug, Deserialize)]
pub struct ListReply {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_message_delivery() {
        let body = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "BUSINESS_ID",
                "changes": [{
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": {"phone_number_id": "123456789"},
                        "messages": [{
                            "from": "15559876543",
                            "id": "wamid.abc123",
                            "timestamp": "1700000000",
                            "text": {"body": "hello"},
                            "type": "text"
                        }]
                    },
                    "field": "messages"
                }]
            }]
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.object, "whatsapp_business_account");
        let message = &event.entry[0].changes[0].value.messages[0];
        assert_eq!(message.from, "15559876543");
        assert_eq!(message.message_type, "text");
        assert_eq!(message.text.as_ref().unwrap().body, "hello");
        assert!(message.interactive.is_none());
    }

    #[test]
    fn parses_list_reply() {
        let body = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "15559876543",
                            "id": "wamid.list1",
                            "type": "interactive",
                            "interactive": {
                                "type": "list_reply",
                                "list_reply": {
                                    "id": "syllabus",
                                    "title": "Syllabus",
                                    "description": "View RGPV syllabus"
                                }
                            }
                        }]
                    }
                }]
            }]
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        let message = &event.entry[0].changes[0].value.messages[0];
        let interactive = message.interactive.as_ref().unwrap();
        assert_eq!(interactive.reply_type, "list_reply");
        assert_eq!(interactive.list_reply.as_ref().unwrap().id, "syllabus");
    }

    #[test]
    fn status_only_delivery_has_no_messages() {
        let body = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "statuses": [{"id": "wamid.x", "status": "delivered"}]
                    }
                }]
            }]
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        assert!(event.entry[0].changes[0].value.messages.is_empty());
    }
}
