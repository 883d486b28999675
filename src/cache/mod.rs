//! Cache module for memoizing scraped pages and API responses
//!
//! Two cache flavours share the same `get_or_fetch` contract: if the key is
//! present the stored value is returned without any I/O, otherwise the fetch
//! future runs once and its result is stored. Neither cache evicts.
//!
//! - [`MemoryCache`] lives for the process only.
//! - [`DiskCache`] is a write-through JSON file that survives across runs.

mod disk;
mod memory;

pub use disk::{CacheError, DiskCache};
pub use memory::MemoryCache;
