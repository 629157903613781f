//! Delete flow shared by every resource kind

use super::kinds::ResourceKind;
use crate::client::AdminClient;
use crate::diagnostics::{report_http_error_custom_id, Diagnostics, INVALID_PROVIDER_CONFIGURATION};
use crate::retry::RetryExecutor;
use tracing::info;

/// Delete one object using the kind's known retryable statuses
pub async fn delete_resource(
    client: &AdminClient,
    executor: &RetryExecutor,
    kind: ResourceKind,
    id: &str,
) -> Diagnostics {
    delete_resource_with_statuses(client, executor, kind, id, kind.retryable_delete_statuses())
        .await
}

/// Delete one object, retrying on `retryable` statuses.
///
/// A 404 is not an error: the object is already gone.
pub async fn delete_resource_with_statuses(
    client: &AdminClient,
    executor: &RetryExecutor,
    kind: ResourceKind,
    id: &str,
    retryable: &[u16],
) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    let path = match kind.object_path(id) {
        Ok(path) => path,
        Err(e) => {
            diagnostics.add_attribute_error(
                kind.id_attribute(),
                INVALID_PROVIDER_CONFIGURATION,
                e.to_string(),
            );
            return diagnostics;
        }
    };

    match executor.run(retryable, || client.delete(&path)).await {
        Ok(()) => info!(kind = %kind, id, "Deleted {} '{}'", kind.label(), id),
        Err(e) if e.is_not_found() => {
            info!(kind = %kind, id, "{} '{}' was already deleted", kind.label(), id);
        }
        Err(e) => report_http_error_custom_id(
            &mut diagnostics,
            &format!("An error occurred while deleting the {}", kind.label()),
            &e,
            Some(kind.id_attribute()),
        ),
    }

    diagnostics
}
