/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::ResourceId;
use crate::resources::ResourceKind;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registration errors surfaced synchronously to callers
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RegistryError {
    #[error("Resource id '{0}' is already registered")]
    #[diagnostic(
        code(registry::duplicate_id),
        help("Dispose the live resource first or namespace the id by component and purpose.")
    )]
    DuplicateId(ResourceId),

    #[error("No async runtime available to start a {kind} resource")]
    #[diagnostic(
        code(registry::no_runtime),
        help("Timers are driven by tokio. Create them from within a tokio runtime.")
    )]
    NoRuntime { kind: ResourceKind },

    #[error("Interval '{id}' has a zero period")]
    #[diagnostic(
        code(registry::invalid_period),
        help("Interval periods must be greater than zero.")
    )]
    InvalidPeriod { id: ResourceId },
}

/// Result type for registration operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failure of a kind-specific disposal action
///
/// Never leaves the disposal engine; it is logged and counted.
#[derive(Error, Debug)]
pub(crate) enum DisposeError {
    #[error("{0:#}")]
    Failed(anyhow::Error),

    #[error("disposal action panicked: {0}")]
    Panicked(String),
}

impl DisposeError {
    /// Build from a `catch_unwind` payload
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        DisposeError::Panicked(message)
    }
}
