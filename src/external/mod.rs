//! Outbound HTTP plumbing shared by the indexing backends.

pub mod client;

pub use client::build_http_client;
