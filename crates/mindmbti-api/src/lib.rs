// Typed HTTP client for the MindMBTI backend.

pub mod cancel;
pub mod client;
pub mod error;
pub mod models;

pub use cancel::CancelToken;
pub use client::{ApiClient, ClientBuildError};
pub use error::ApiError;
