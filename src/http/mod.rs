//! HTTP client module for the Kestrel scanner

pub mod client;
pub use client::HttpClient;
