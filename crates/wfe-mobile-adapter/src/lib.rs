/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public workflow engine adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{AuthManager, Session, SessionStore};

// Re-export commonly used types from http
pub use http::{AuthenticatedClient, ClientConfig, DEFAULT_BASE_URL, Result, WfeClient, WfeError};

// Re-export all types
pub use types::*;
