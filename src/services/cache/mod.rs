pub mod client;
pub mod memory;
pub mod ttl;
pub mod valkey;

pub use client::{CacheClient, CacheError};
pub use memory::MemoryCache;
pub use ttl::{DEFAULT_CACHE_TTL, TtlCache};
pub use valkey::ValkeyClient;
