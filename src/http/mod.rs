//! HTTP client used for the catalog request and archive downloads.

mod client;

pub use client::HttpClient;
