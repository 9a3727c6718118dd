//! Cache module - named, typed caches on top of Moka.
//!
//! Repositories ask the `CacheRegistry` for a cache by name; the registry
//! hands back a shared `TypedCache` so every clone of a repository sees the
//! same entries.
//!
//! ```rust,ignore
//! let selections = registry.get_or_create::<(i64, NaiveDate), Selection>(
//!     "selections_by_day",
//!     CacheConfig::immutable(),
//! );
//! selections.insert((chat_id, day), selection);
//! ```

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
