/*!
 * Component Scope Guard
 *
 * RAII wrapper around a component scope with automatic cleanup on drop
 */

use super::traits::Guard;
use super::{GuardError, GuardMetadata, GuardResult};
use crate::registry::ComponentScope;
use std::ops::Deref;

/// Scope guard that disposes every resource of its component when dropped
///
/// # Example
///
/// ```ignore
/// {
///     let scope = registry.scope("Gallery").guard();
///     scope.create_abort_handle("Gallery:fetch", "image fetch")?;
/// } // Gallery resources disposed here
/// ```
pub struct ScopeGuard {
    scope: ComponentScope,
    metadata: GuardMetadata,
    active: bool,
}

impl ScopeGuard {
    pub(crate) fn new(scope: ComponentScope) -> Self {
        Self {
            scope,
            metadata: GuardMetadata::new("component_scope"),
            active: true,
        }
    }

    /// Disable automatic cleanup and hand back the scope
    pub fn defuse(mut self) -> ComponentScope {
        self.active = false;
        self.scope.clone()
    }
}

impl Deref for ScopeGuard {
    type Target = ComponentScope;

    fn deref(&self) -> &Self::Target {
        &self.scope
    }
}

impl Guard for ScopeGuard {
    fn resource_type(&self) -> &'static str {
        self.metadata.resource_type
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) -> GuardResult<()> {
        if !self.active {
            return Err(GuardError::AlreadyReleased);
        }
        self.active = false;
        self.scope.cleanup_component();
        Ok(())
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if self.active {
            let disposed = self.scope.cleanup_component();
            tracing::debug!(
                component = %self.scope.component(),
                disposed,
                lifetime_us = self.metadata.lifetime_micros(),
                "scope guard dropped"
            );
        }
    }
}
