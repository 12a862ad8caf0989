//! Environment-derived configuration, read once at process start.

use anyhow::{Context, Result};
use std::env;

const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com/v22.0";
const DEFAULT_PHONE_NUMBER_ID: &str = "863358323523381";
const DEFAULT_VERIFY_TOKEN: &str = "your_verify_token_here";
const DEFAULT_AZURE_ENDPOINT: &str = "https://baarilabs.openai.azure.com";
const DEFAULT_AZURE_DEPLOYMENT: &str = "gpt-4o";
const DEFAULT_AZURE_API_VERSION: &str = "2024-12-01-preview";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the WhatsApp Cloud API.
    pub whatsapp_token: String,
    /// Sender account (phone number id) used in the /messages path.
    pub phone_number_id: String,
    /// Shared token for the GET /webhook subscription handshake.
    pub verify_token: String,
    /// App secret for X-Hub-Signature-256 verification. When unset,
    /// webhook signatures are not checked.
    pub app_secret: Option<String>,
    /// Graph API base URL, overridable for tests.
    pub graph_api_base: String,
    pub azure_endpoint: String,
    pub azure_api_key: String,
    pub azure_deployment: String,
    pub azure_api_version: String,
    pub port: u16,
}

impl Config {
    /// Read everything from the environment. Call `dotenv::dotenv().ok()`
    /// before this so a local `.env` file is picked up.
    pub fn from_env() -> Result<Self> {
        let whatsapp_token =
            env::var("WHATSAPP_TOKEN").context("WHATSAPP_TOKEN must be set")?;
        let azure_api_key =
            env::var("AZURE_OPENAI_API_KEY").context("AZURE_OPENAI_API_KEY must be set")?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            whatsapp_token,
            phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID")
                .unwrap_or_else(|_| DEFAULT_PHONE_NUMBER_ID.to_string()),
            verify_token: env::var("VERIFY_TOKEN")
                .unwrap_or_else(|_| DEFAULT_VERIFY_TOKEN.to_string()),
            app_secret: env::var("WHATSAPP_APP_SECRET").ok().filter(|s| !s.is_empty()),
            graph_api_base: env::var("GRAPH_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GRAPH_API_BASE.to_string()),
            azure_endpoint: env::var("AZURE_OPENAI_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_AZURE_ENDPOINT.to_string()),
            azure_api_key,
            azure_deployment: env::var("AZURE_OPENAI_DEPLOYMENT")
                .unwrap_or_else(|_| DEFAULT_AZURE_DEPLOYMENT.to_string()),
            azure_api_version: env::var("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_AZURE_API_VERSION.to_string()),
            port,
        })
    }
}
