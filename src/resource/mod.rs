//! Deletable PingFederate configuration objects
//!
//! Each [`ResourceKind`] knows where its objects live in the admin API and
//! which delete statuses the server is known to return transiently for it.
//! [`delete_resource`] runs the delete through the retry executor and turns
//! the outcome into diagnostics, treating 404 as already deleted.

mod delete;
mod kinds;

pub use delete::{delete_resource, delete_resource_with_statuses};
pub use kinds::ResourceKind;
