/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod executor;
pub mod process;
pub mod task;

pub use error::{Result, WfeError};

pub use client::{AuthenticatedClient, ClientConfig, DEFAULT_BASE_URL, WfeClient};
