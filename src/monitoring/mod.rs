/*!
 * Monitoring Module
 * Logging setup for registry diagnostics
 */

mod tracer;

pub use tracer::init_tracing;
