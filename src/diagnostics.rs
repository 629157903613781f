//! User-facing diagnostics
//!
//! Errors and warnings are collected rather than returned one at a time, so
//! a single failed call can report every validation problem the server
//! found.

use crate::error::Error;
use crate::retry::ResponseStatus;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Summary used for errors reported by the admin API
pub const PINGFEDERATE_API_ERROR: &str = "PingFederate API error";
/// Summary used for field validation errors reported by the admin API
pub const PINGFEDERATE_VALIDATION_ERROR: &str = "PingFederate validation error";
/// Summary used for configuration problems
pub const INVALID_PROVIDER_CONFIGURATION: &str = "Invalid provider configuration";

static LOWER_OR_DIGIT_TO_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fails the operation
    Error,
    /// Reported, but the operation succeeded
    Warning,
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error or warning
    pub severity: Severity,
    /// One-line summary
    pub summary: String,
    /// Multi-line detail
    pub detail: String,
    /// Dotted attribute path the problem belongs to, if any
    pub attribute: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(f, "{level}: {}", self.summary)?;
        if let Some(attribute) = &self.attribute {
            write!(f, " (attribute '{attribute}')")?;
        }
        if !self.detail.is_empty() {
            write!(f, "\n{}", self.detail)?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Error, summary.into(), detail.into(), None);
    }

    /// Record a warning
    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Warning, summary.into(), detail.into(), None);
    }

    /// Record an error against one attribute
    pub fn add_attribute_error(
        &mut self,
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(
            Severity::Error,
            summary.into(),
            detail.into(),
            Some(attribute.into()),
        );
    }

    fn push(&mut self, severity: Severity, summary: String, detail: String, attribute: Option<String>) {
        self.items.push(Diagnostic {
            severity,
            summary,
            detail,
            attribute,
        });
    }

    /// Append every diagnostic from `other`
    pub fn append(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// True if any error was recorded
    pub fn has_error(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    /// Errors only
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    /// Warnings only
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Everything, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// PingFederate error bodies
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PingFederateValidationError {
    message: String,
    developer_message: String,
    field_path: String,
    error_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PingFederateErrorResponse {
    result_id: String,
    message: String,
    validation_errors: Vec<PingFederateValidationError>,
}

/// Convert a PingFederate camelCase identifier to its snake_case attribute name
pub fn to_terraform_identifier(pf_identifier: &str) -> String {
    LOWER_OR_DIGIT_TO_UPPER
        .replace_all(pf_identifier, "${1}_${2}")
        .to_lowercase()
}

fn status_line(status: Option<u16>) -> String {
    status
        .and_then(|s| reqwest::StatusCode::from_u16(s).ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Report a failed admin API call
pub fn report_http_error(diagnostics: &mut Diagnostics, summary: &str, error: &Error) {
    report_http_error_custom_id(diagnostics, summary, error, None);
}

/// Report a failed admin API call, mapping the server's `id` field to
/// `custom_id` for resources whose identifier attribute is named differently
pub fn report_http_error_custom_id(
    diagnostics: &mut Diagnostics,
    summary: &str,
    error: &Error,
    custom_id: Option<&str>,
) {
    let Some(body) = error.response_body() else {
        diagnostics.add_error(PINGFEDERATE_API_ERROR, format!("{summary}\n{error}"));
        return;
    };

    debug!("Error HTTP response body: {}", body);
    let status = status_line(error.status());

    let pf_error: PingFederateErrorResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => {
            diagnostics.add_error(
                PINGFEDERATE_API_ERROR,
                format!("{summary}\n{status} - Detail:\n{body}"),
            );
            return;
        }
    };

    if pf_error.validation_errors.is_empty() {
        diagnostics.add_error(
            PINGFEDERATE_API_ERROR,
            format!(
                "Error summary: {summary}\nMessage: {}\nHTTP status: {status}\nResult ID: {}",
                pf_error.message, pf_error.result_id
            ),
        );
        return;
    }

    for validation in pf_error.validation_errors {
        let mut detail = format!(
            "Error summary: {summary}\nMessage: {}\nHTTP status: {status}",
            validation.message
        );
        if !validation.field_path.is_empty() {
            detail.push_str("\nPingFederate field path: ");
            detail.push_str(&validation.field_path);
        }
        if !validation.error_id.is_empty() {
            detail.push_str("\nError ID: ");
            detail.push_str(&validation.error_id);
        }
        if !validation.developer_message.is_empty() {
            detail.push_str("\nDeveloper message: ");
            detail.push_str(&validation.developer_message);
        }

        if validation.field_path.is_empty() {
            diagnostics.add_error(PINGFEDERATE_VALIDATION_ERROR, detail);
        } else {
            let field_path = match custom_id {
                Some(id) if validation.field_path == "id" => id,
                _ => validation.field_path.as_str(),
            };
            diagnostics.add_attribute_error(
                to_terraform_identifier(field_path),
                PINGFEDERATE_VALIDATION_ERROR,
                detail,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("policyId", "policy_id")]
    #[test_case("id", "id")]
    #[test_case("configuration.fields", "configuration.fields")]
    #[test_case("attributeContract.coreAttributes", "attribute_contract.core_attributes")]
    #[test_case("oauth2ClientId", "oauth2_client_id")]
    fn test_to_terraform_identifier(input: &str, expected: &str) {
        assert_eq!(to_terraform_identifier(input), expected);
    }

    #[test]
    fn test_api_error_without_validation_errors() {
        let mut diags = Diagnostics::new();
        let err = Error::api(
            403,
            r#"{"resultId":"resource_in_use","message":"The captcha provider is in use."}"#,
        );
        report_http_error(&mut diags, "An error occurred while deleting", &err);

        assert_eq!(diags.len(), 1);
        let d = diags.iter().next().unwrap();
        assert_eq!(d.summary, PINGFEDERATE_API_ERROR);
        assert_eq!(
            d.detail,
            "Error summary: An error occurred while deleting\nMessage: The captcha provider is in use.\nHTTP status: 403 Forbidden\nResult ID: resource_in_use"
        );
        assert!(d.attribute.is_none());
    }

    #[test]
    fn test_validation_errors_map_to_attributes() {
        let mut diags = Diagnostics::new();
        let body = serde_json::json!({
            "resultId": "validation_error",
            "message": "Validation error(s) occurred.",
            "validationErrors": [
                {
                    "message": "Name is required",
                    "fieldPath": "name",
                    "errorId": "required_field_missing"
                },
                {
                    "message": "ID already used",
                    "fieldPath": "id",
                    "developerMessage": "duplicate"
                },
                {
                    "message": "Something else"
                }
            ]
        });
        let err = Error::api(422, body.to_string());
        report_http_error_custom_id(&mut diags, "create", &err, Some("policyId"));

        let items: Vec<_> = diags.iter().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].attribute.as_deref(), Some("name"));
        assert!(items[0].detail.contains("Error ID: required_field_missing"));
        assert!(items[0].detail.contains("HTTP status: 422 Unprocessable Entity"));
        assert_eq!(items[1].attribute.as_deref(), Some("policy_id"));
        assert!(items[1].detail.contains("Developer message: duplicate"));
        assert!(items[2].attribute.is_none());
        assert!(diags
            .iter()
            .all(|d| d.summary == PINGFEDERATE_VALIDATION_ERROR));
    }

    #[test]
    fn test_unparseable_body() {
        let mut diags = Diagnostics::new();
        let err = Error::api(502, "<html>Bad Gateway</html>");
        report_http_error(&mut diags, "delete", &err);

        let d = diags.iter().next().unwrap();
        assert_eq!(d.detail, "delete\n502 Bad Gateway - Detail:\n<html>Bad Gateway</html>");
    }

    #[test]
    fn test_no_response() {
        let mut diags = Diagnostics::new();
        let err = Error::auth("token endpoint unreachable");
        report_http_error(&mut diags, "delete", &err);

        let d = diags.iter().next().unwrap();
        assert_eq!(
            d.detail,
            "delete\nAuthentication failed: token endpoint unreachable"
        );
        assert!(diags.has_error());
    }

    #[test]
    fn test_display_and_append() {
        let mut diags = Diagnostics::new();
        diags.add_attribute_error("name", "Bad", "detail");
        let mut other = Diagnostics::new();
        other.add_warning("Careful", "");
        diags.append(other);

        let rendered: Vec<String> = diags.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "Error: Bad (attribute 'name')\ndetail".to_string(),
                "Warning: Careful".to_string()
            ]
        );
        assert_eq!(diags.errors().count(), 1);
    }
}
