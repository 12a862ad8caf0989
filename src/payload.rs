//! Outbound WhatsApp Cloud API message payloads.
//!
//! Pure constructors; nothing here performs I/O. The platform's field limits
//! on interactive messages (20-character button labels, 60-character text
//! headers and footers) are applied here by truncation. Row ids and row
//! counts in list messages are not validated; the Cloud API rejects bad
//! combinations with an HTTP error.

use serde::Serialize;

/// Button label limit for CTA URL messages.
const MAX_BUTTON_TEXT: usize = 20;
/// Text header and footer limit for interactive messages.
const MAX_HEADER_FOOTER_TEXT: usize = 60;

/// Complete request body for POST /{phone_number_id}/messages.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub messaging_product: &'static str,
    pub recipient_type: &'static str,
    pub to: String,
    #[serde(flatten)]
    pub payload: OutboundPayload,
}

impl MessageRequest {
    pub fn new(to: &str, payload: OutboundPayload) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to: to.to_string(),
            payload,
        }
    }
}

/// The three message shapes this bridge sends.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundPayload {
    Text { text: TextContent },
    Interactive { interactive: Interactive },
}

#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    pub preview_url: bool,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interactive {
    CtaUrl {
        #[serde(skip_serializing_if = "Option::is_none")]
        header: Option<Header>,
        body: Text,
        action: CtaAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        footer: Option<Text>,
    },
    List {
        header: Header,
        body: Text,
        footer: Text,
        action: ListAction,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Text {
    pub text: String,
}

/// Optional media or text header on an interactive message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Header {
    Text { text: String },
    Image { image: MediaLink },
    Video { video: MediaLink },
    Document { document: DocumentLink },
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaLink {
    pub link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLink {
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CtaAction {
    pub name: &'static str,
    pub parameters: CtaParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct CtaParameters {
    pub display_text: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListAction {
    pub button: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Header {
    /// Text header, truncated to the platform limit.
    pub fn text(value: &str) -> Self {
        Header::Text {
            text: truncate_chars(value, MAX_HEADER_FOOTER_TEXT),
        }
    }

    pub fn image(link: &str) -> Self {
        Header::Image {
            image: MediaLink {
                link: link.to_string(),
            },
        }
    }

    pub fn video(link: &str) -> Self {
        Header::Video {
            video: MediaLink {
                link: link.to_string(),
            },
        }
    }

    pub fn document(link: &str, filename: Option<&str>) -> Self {
        Header::Document {
            document: DocumentLink {
                link: link.to_string(),
                filename: filename.map(str::to_string),
            },
        }
    }
}

impl OutboundPayload {
    /// Plain text message with link previews disabled.
    pub fn text(body: &str) -> Self {
        OutboundPayload::Text {
            text: TextContent {
                preview_url: false,
                body: body.to_string(),
            },
        }
    }

    /// CTA URL message: body, one URL button, optional header and footer.
    /// The button label is truncated to 20 characters, the footer to 60.
    pub fn cta_url(
        body_text: &str,
        button_text: &str,
        button_url: &str,
        header: Option<Header>,
        footer_text: Option<&str>,
    ) -> Self {
        OutboundPayload::Interactive {
            interactive: Interactive::CtaUrl {
                header,
                body: Text {
                    text: body_text.to_string(),
                },
                action: CtaAction {
                    name: "cta_url",
                    parameters: CtaParameters {
                        display_text: truncate_chars(button_text, MAX_BUTTON_TEXT),
                        url: button_url.to_string(),
                    },
                },
                footer: footer_text.map(|text| Text {
                    text: truncate_chars(text, MAX_HEADER_FOOTER_TEXT),
                }),
            },
        }
    }

    /// Interactive list message: text header/body/footer, a button that
    /// opens the list, and ordered sections of ordered rows.
    pub fn list(
        header_text: &str,
        body_text: &str,
        footer_text: &str,
        button_text: &str,
        sections: Vec<Section>,
    ) -> Self {
        OutboundPayload::Interactive {
            interactive: Interactive::List {
                header: Header::text(header_text),
                body: Text {
                    text: body_text.to_string(),
                },
                footer: Text {
                    text: footer_text.to_string(),
                },
                action: ListAction {
                    button: button_text.to_string(),
                    sections,
                },
            },
        }
    }
}

/// Truncate to at most `max` characters, never splitting a code point.
fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_shape() {
        let request = MessageRequest::new("15551234567", OutboundPayload::text("hi there"));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messaging_product"], "whatsapp");
        assert_eq!(json["recipient_type"], "individual");
        assert_eq!(json["to"], "15551234567");
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"]["body"], "hi there");
        assert_eq!(json["text"]["preview_url"], false);
    }

    #[test]
    fn cta_button_text_truncated_to_20_chars() {
        let payload = OutboundPayload::cta_url(
            "body",
            "This button label is far too long",
            "https://example.com",
            None,
            None,
        );
        let json = serde_json::to_value(&payload).unwrap();

        let display = json["interactive"]["action"]["parameters"]["display_text"]
            .as_str()
            .unwrap();
        assert_eq!(display, "This button label is");
        assert_eq!(display.chars().count(), 20);
    }

    #[test]
    fn short_button_text_passes_through() {
        let payload =
            OutboundPayload::cta_url("body", "Visit", "https://example.com", None, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json["interactive"]["action"]["parameters"]["display_text"],
            "Visit"
        );
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let label: String = "ä".repeat(25);
        let payload =
            OutboundPayload::cta_url("body", &label, "https://example.com", None, None);
        let json = serde_json::to_value(&payload).unwrap();
        let display = json["interactive"]["action"]["parameters"]["display_text"]
            .as_str()
            .unwrap();
        assert_eq!(display.chars().count(), 20);
    }

    #[test]
    fn header_and_footer_truncated_to_60_chars() {
        let long = "x".repeat(75);
        let payload = OutboundPayload::cta_url(
            "body",
            "Go",
            "https://example.com",
            Some(Header::text(&long)),
            Some(long.as_str()),
        );
        let json = serde_json::to_value(&payload).unwrap();

        let header = json["interactive"]["header"]["text"].as_str().unwrap();
        let footer = json["interactive"]["footer"]["text"].as_str().unwrap();
        assert_eq!(header.chars().count(), 60);
        assert_eq!(footer.chars().count(), 60);
    }

    #[test]
    fn short_footer_passes_through() {
        let payload = OutboundPayload::cta_url(
            "body",
            "Go",
            "https://example.com",
            None,
            Some("Powered by Simplifiiq"),
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["interactive"]["footer"]["text"], "Powered by Simplifiiq");
    }

    #[test]
    fn cta_omits_absent_header_and_footer() {
        let payload =
            OutboundPayload::cta_url("body", "Go", "https://example.com", None, None);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["interactive"]["type"], "cta_url");
        assert!(json["interactive"].get("header").is_none());
        assert!(json["interactive"].get("footer").is_none());
        assert_eq!(json["interactive"]["action"]["name"], "cta_url");
    }

    #[test]
    fn image_header_carries_link() {
        let payload = OutboundPayload::cta_url(
            "body",
            "Go",
            "https://example.com",
            Some(Header::image("https://example.com/banner.png")),
            None,
        );
        let json = serde_json::to_value(&payload).unwrap();

        let header = &json["interactive"]["header"];
        assert_eq!(header["type"], "image");
        assert_eq!(header["image"]["link"], "https://example.com/banner.png");
    }

    #[test]
    fn document_header_with_and_without_filename() {
        let with = Header::document("https://example.com/a.pdf", Some("a.pdf"));
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["document"]["link"], "https://example.com/a.pdf");
        assert_eq!(json["document"]["filename"], "a.pdf");

        let without = Header::document("https://example.com/a.pdf", None);
        let json = serde_json::to_value(&without).unwrap();
        assert!(json["document"].get("filename").is_none());
    }

    #[test]
    fn list_message_shape() {
        let sections = vec![Section {
            title: "Choose an option".to_string(),
            rows: vec![
                Row {
                    id: "one".to_string(),
                    title: "One".to_string(),
                    description: Some("first".to_string()),
                },
                Row {
                    id: "two".to_string(),
                    title: "Two".to_string(),
                    description: None,
                },
            ],
        }];
        let payload =
            OutboundPayload::list("Main Menu", "Pick one:", "Tap Select", "Select", sections);
        let json = serde_json::to_value(&payload).unwrap();

        let interactive = &json["interactive"];
        assert_eq!(interactive["type"], "list");
        assert_eq!(interactive["header"]["type"], "text");
        assert_eq!(interactive["header"]["text"], "Main Menu");
        assert_eq!(interactive["body"]["text"], "Pick one:");
        assert_eq!(interactive["footer"]["text"], "Tap Select");
        assert_eq!(interactive["action"]["button"], "Select");

        let rows = interactive["action"]["sections"][0]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], "one");
        assert_eq!(rows[0]["description"], "first");
        assert!(rows[1].get("description").is_none());
    }
}
