//! WhatsApp AI webhook bridge.
//!
//! Receives WhatsApp Cloud API webhook events and answers each message with
//! either an AI-generated text reply or a prebuilt interactive message
//! (menu list, CTA URL buttons).

pub mod ai;
pub mod config;
pub mod courier;
pub mod payload;
pub mod server;
pub mod types;
pub mod whatsapp;
