//! Cache Module
//!
//! Response cache with canonical request keys, TTL expiry and
//! substring/pattern invalidation.

mod clock;
mod engine;
mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use engine::{Cache, DEFAULT_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{derive_key, Params};
pub use stats::{CacheStats, Counters};
pub use store::ExpiryStore;
