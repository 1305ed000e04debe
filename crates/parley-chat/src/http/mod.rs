//! HTTP transport for the assistant API.
//!
//! Talks JSON over `reqwest` to a versioned REST API:
//! `POST chat`, `GET|DELETE conversation/{session_id}`, `GET health`.

mod api;
mod client;
mod config;


pub use client::HttpTransport;
pub use config::HttpConfig;
