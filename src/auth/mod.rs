//! Authentication module
//!
//! Supports the three admin API authentication methods: HTTP Basic,
//! a static access token, and OAuth2 client credentials.
//!
//! The `Authenticator` applies credentials to requests and caches the
//! OAuth2 token until shortly before it expires.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{CachedToken, Credentials};
