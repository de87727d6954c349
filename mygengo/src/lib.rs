#![doc = include_str!("../README.md")]

mod client;
pub use client::{
    Client, DEFAULT_MIN_REQUEST_INTERVAL, DEFAULT_NUM_TRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT,
    PRODUCTION_URL, SANDBOX_URL,
};

mod credentials;
pub use credentials::Credentials;

mod error;
pub use error::Error;

mod account;
mod envelope;
mod job;
mod jobs;
mod request;
mod service;
mod throttle;

mod types_rs;
pub use types_rs::*;

/// The decoded `response` payload, its shape depends on the endpoint.
pub use serde_json::Value;
