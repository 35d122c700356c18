//! Authentication module
//!
//! Supports: Basic (over `bearer:<token>`) and raw-token headers.
//!
//! Which scheme applies is decided by the API root being called, see
//! [`AuthConfig::for_api`].

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
