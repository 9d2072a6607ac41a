/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - action and info endpoint communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod action;
pub mod client;
pub mod error;
pub mod info;

pub use error::{BearerKind, ErrorKind, Result, TokenLayerError};

pub use client::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_EXPIRES_AFTER_MS, TokenLayerClient,
    normalize_api_base_url,
};
