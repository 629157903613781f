//! PingFederate admin API client
//!
//! Thin reqwest wrapper that knows the admin API conventions:
//!
//! - **Base URL**: `https_host` + `admin_api_path`
//! - **Headers**: `X-Xsrf-Header` and `X-BypassExternalValidation` on every request
//! - **TLS**: optional trust-all, extra root CAs from PEM files
//! - **Authentication**: basic, access token or OAuth2 client credentials
//!
//! Non-2xx responses are turned into [`crate::Error::Api`] so the retry
//! executor can classify them by status.

mod admin;

pub use admin::{AdminClient, ServerVersion};
