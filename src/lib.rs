//! ragline: a terminal client for retrieval-augmented question answering
//! services.
//!
//! The crate splits into a typed async API client ([`client::RagClient`]),
//! pure rendering helpers ([`render`]), ephemeral notifications
//! ([`notify`]), and two frontends: one-shot CLI commands ([`cli`]) and an
//! interactive terminal UI ([`tui`]).

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod render;
pub mod tui;

pub use client::RagClient;
pub use error::RagError;
