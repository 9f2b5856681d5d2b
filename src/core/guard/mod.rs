/*!
 * RAII Resource Guards
 *
 * Scope-bound guards that release registry resources on drop.
 *
 * ## Example
 *
 * ```ignore
 * let guard = registry.scope("SearchPanel").guard();
 * guard.create_timeout("SearchPanel:debounce", || {}, Duration::from_millis(300), "debounce")?;
 * // All SearchPanel resources released when `guard` drops
 * ```
 */

mod scope;
mod traits;

pub use scope::ScopeGuard;
pub use traits::Guard;

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur during guard operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Resource already released")]
    AlreadyReleased,
}

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: std::time::Instant,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            creation_time: std::time::Instant::now(),
        }
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
