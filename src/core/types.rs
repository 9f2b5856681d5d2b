/*!
 * Core Types
 * Common types used across the registry
 */

/// Caller-supplied resource identifier, unique among live records
pub type ResourceId = String;

/// Component (owner) tag attached to every resource
pub type ComponentName = String;

/// Timestamp in microseconds since the owning registry was created
pub type Timestamp = u64;

/// Insertion sequence number assigned by the store
pub type Sequence = u64;
