// src/prefetch/mod.rs
// =============================================================================
// Background image prefetching.
//
// Submodules:
// - dispatcher: spawns one detached fetch per image URL
// - in_flight: counts running background tasks so callers can wait them out
// =============================================================================

mod dispatcher;
mod in_flight;

pub use dispatcher::PrefetchDispatcher;
pub use in_flight::{InFlight, InFlightGuard};
