//! Network Module
//!
//! The shell never talks to the network itself. Built-ins that need a URL
//! fetched go through an injected [`Fetcher`], bounded by a timeout and a
//! response-size cap.

pub mod fetch;

pub use fetch::{fetch_bounded, is_fetchable_url, Fetcher, NetworkError};
