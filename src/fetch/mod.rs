//! HTTP boundary: raw clients and the outcome-classifying transport.

mod basic;
mod client;
mod transport;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use transport::{HttpTransport, Response, Transport, classify_response};
