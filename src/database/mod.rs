//! Database module exports.

mod error;
mod memory;
mod models;
mod mongo;
mod repository;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::*;
pub use mongo::Database;
pub use repository::{MemberRepository, SelectionRepository};
pub use store::{MemberStore, SelectionStore};
