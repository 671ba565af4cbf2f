/*
[INPUT]:  Login credentials
[OUTPUT]: Sessions (bearer token + display name) and auth errors
[POS]:    Auth layer - handles workflow engine authentication
[UPDATE]: When auth flow or session contents change
*/

pub mod manager;
pub mod session;

pub use manager::AuthManager;
pub use session::{Session, SessionStore};
