// Cache storage module

pub mod memory;
pub mod models;
pub mod store;

pub use memory::MemoryStore;
pub use models::{CacheStats, RequestIdentity, ResponseSnapshot};
pub use store::CacheStore;
