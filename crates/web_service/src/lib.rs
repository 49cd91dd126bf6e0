//! web_service - Completion relay and library routes
//!
//! `POST /api/chat` forwards the message log to the language model and
//! streams the reply back in the UI message stream format. The library
//! routes expose transcripts and prompts read-only.

pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{AppState, WebService};
