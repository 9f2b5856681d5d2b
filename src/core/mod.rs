/*!
 * Core Module
 * Fundamental registry types, error handling and guards
 */

pub mod errors;
pub mod guard;
pub mod types;

// Re-export for convenience
pub use errors::{RegistryError, RegistryResult};
pub use guard::{Guard, GuardError, GuardMetadata, GuardResult, ScopeGuard};
pub use types::*;
