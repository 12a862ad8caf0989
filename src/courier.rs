//! Inbound message routing.
//!
//! Verifies the subscription handshake, walks a webhook delivery's nested
//! entries, and dispatches each message: interactive list replies resolve
//! through the menu table, the `menu` keyword sends the list itself, and
//! everything else gets an AI-generated text reply.

use crate::ai::{CompletionClient, FALLBACK_REPLY};
use crate::payload::{Header, OutboundPayload, Row, Section};
use crate::types::{InboundMessage, WebhookEvent};
use crate::whatsapp::{DeliveryError, WhatsAppClient};
use tracing::{error, info, warn};

/// Only deliveries for this object type are processed.
pub const EXPECTED_OBJECT: &str = "whatsapp_business_account";

const MENU_KEYWORD: &str = "menu";

/// GET /webhook verification failed: wrong mode or wrong token.
#[derive(Debug, thiserror::Error)]
#[error("webhook verification failed")]
pub struct HandshakeMismatch;

/// Verify the subscription handshake and return the challenge to echo back.
pub fn verify_handshake(
    mode: &str,
    token: &str,
    challenge: &str,
    expected_token: &str,
) -> Result<String, HandshakeMismatch> {
    if mode == "subscribe" && token == expected_token {
        Ok(challenge.to_string())
    } else {
        Err(HandshakeMismatch)
    }
}

/// One selectable menu row and the reply it resolves to.
///
/// The same table drives the rows of the list message and the lookup when a
/// selection comes back, so new options are purely additive.
pub struct MenuEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub respond: fn() -> OutboundPayload,
}

pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        id: "simplifiiq",
        title: "Simplifiiq",
        description: "AI-Powered Business Solutions",
        respond: simplifiiq_cta,
    },
    MenuEntry {
        id: "syllabus",
        title: "Syllabus",
        description: "View RGPV syllabus",
        respond: syllabus_cta,
    },
];

fn simplifiiq_cta() -> OutboundPayload {
    OutboundPayload::cta_url(
        "Explore Simplifiiq – AI-Powered Business Solutions",
        "Visit Website",
        "https://www.simplifiiq.com/",
        Some(Header::image(
            "https://media.licdn.com/dms/image/v2/D4D16AQHWtW1MlWLbwg/profile-displaybackgroundimage-shrink_200_800/B4DZlhYHUJGwAY-/0/1758275336739?e=2147483647&v=beta&t=GYTC2gKGsqDSuhGUWUf2mFqBJZMjD7T-MKZR9I9A-P0",
        )),
        Some("Powered by Simplifiiq"),
    )
}

fn syllabus_cta() -> OutboundPayload {
    OutboundPayload::cta_url(
        "Here is the syllabus for 8th Semester CSE (RGPV)",
        "View Scheme",
        "https://www.rgpv.ac.in/uni/frm_viewscheme.aspx",
        Some(Header::document(
            "https://www.rgpv.ac.in/UC/frm_download_file.aspx?Filepath=CDN/PubContent/Scheme/VIII%20CSE120325054719.pdf",
            Some("RGPV_CSE_8th_Sem_Syllabus.pdf"),
        )),
        Some("Official RGPV syllabus"),
    )
}

/// The interactive list offering every menu row.
pub fn menu_list() -> OutboundPayload {
    let rows = MENU
        .iter()
        .map(|entry| Row {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            description: Some(entry.description.to_string()),
        })
        .collect();

    OutboundPayload::list(
        "Main Menu",
        "Please select one option:",
        "Tap Select to continue",
        "Select",
        vec![Section {
            title: "Choose an option".to_string(),
            rows,
        }],
    )
}

/// Outcome of one webhook delivery.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Delivery was for another object type; nothing was done.
    Ignored,
    /// Every message in the delivery was handled.
    Handled,
}

/// Process a full webhook delivery. The first delivery failure aborts the
/// remaining messages of the batch; the caller answers the whole delivery
/// with a generic error in that case.
pub async fn process_event(
    whatsapp: &WhatsAppClient,
    ai: &CompletionClient,
    event: &WebhookEvent,
) -> Result<Dispatch, DeliveryError> {
    if event.object != EXPECTED_OBJECT {
        return Ok(Dispatch::Ignored);
    }

    for entry in &event.entry {
        for change in &entry.changes {
            for message in &change.value.messages {
                handle_message(whatsapp, ai, message).await?;
            }
        }
    }

    Ok(Dispatch::Handled)
}

async fn handle_message(
    whatsapp: &WhatsAppClient,
    ai: &CompletionClient,
    message: &InboundMessage,
) -> Result<(), DeliveryError> {
    let from = message.from.as_str();

    if message.message_type == "interactive" {
        let selection = message
            .interactive
            .as_ref()
            .filter(|reply| reply.reply_type == "list_reply")
            .and_then(|reply| reply.list_reply.as_ref());

        if let Some(selected) = selection {
            match MENU.iter().find(|entry| entry.id == selected.id) {
                Some(entry) => {
                    whatsapp.send(from, (entry.respond)()).await?;
                }
                None => {
                    warn!("Unknown list selection {:?} from {}", selected.id, from);
                }
            }
        }
        // A list reply never falls through to text handling.
        return Ok(());
    }

    if message.message_type != "text" {
        return Ok(());
    }

    let body = message
        .text
        .as_ref()
        .map(|text| text.body.trim().to_lowercase())
        .unwrap_or_default();
    info!("Message from {}: {}", from, body);

    if body == MENU_KEYWORD {
        whatsapp.send(from, menu_list()).await?;
        return Ok(());
    }

    let reply = match ai.complete(&body).await {
        Ok(text) => text,
        Err(e) => {
            error!("Error generating AI response: {}", e);
            FALLBACK_REPLY.to_string()
        }
    };
    whatsapp.send(from, OutboundPayload::text(&reply)).await?;
    Ok(())
}
